pub mod error;

use crate::config::error::ConfigError;
use crate::shared::utils;
use mlua::{Lua, Table, Value};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_SETTINGS_SHEET: &str = "Настройки";
pub const DEFAULT_SCHEDULE_SHEET: &str = "Расписание";

const DEFAULT_REDIRECT_URL: &str = "http://127.0.0.1:9004";
const DEFAULT_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/calendar.readonly",
    "https://www.googleapis.com/auth/spreadsheets",
];

#[derive(Debug, PartialEq, Eq)]
pub struct Config {
    pub source: Source,
    pub settings: Settings,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Settings {
    pub tz: String,
    pub oauth_file_path: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Source {
    pub google: GoogleSource,
}

#[derive(Debug, PartialEq, Eq)]
pub struct GoogleSource {
    pub oauth2: GoogleOAuth2,
    pub spreadsheet: GoogleSpreadsheet,
}

#[derive(Debug, PartialEq, Eq)]
pub struct GoogleOAuth2 {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub scopes: Vec<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct GoogleSpreadsheet {
    pub spreadsheet_id: String,
    pub settings_sheet: String,
    pub schedule_sheet: String,
}

pub fn init() -> anyhow::Result<Config> {
    let path_buf = get_config_file_path()?;
    load_config(&path_buf)
}

fn get_config_file_path() -> anyhow::Result<PathBuf> {
    let config_file_path = match std::env::var("CAL2GRID_CONFIG_FILE_PATH") {
        Ok(path) => path.trim().to_string(),
        Err(_) => {
            let home_dir =
                env::var("HOME").map_err(|_e| ConfigError::HomeEnvironmentNotFoundError)?;
            format!("{}/.config/cal2grid/config.lua", home_dir)
        }
    };

    let config_file_path_buf = utils::path::expand_tilde(&config_file_path);

    if config_file_path_buf.is_file() {
        Ok(config_file_path_buf)
    } else {
        Err(
            ConfigError::ConfigFileNotFoundError(utils::path::contract_tilde(
                &config_file_path_buf,
            ))
            .into(),
        )
    }
}

fn get_oauth_path() -> anyhow::Result<PathBuf> {
    let home_dir = env::var("HOME").map_err(|_e| ConfigError::HomeEnvironmentNotFoundError)?;
    let default_path = format!("{}/.local/share/cal2grid/oauth", home_dir);

    Ok(PathBuf::from(&default_path))
}

fn load_config(config_file_path: &Path) -> anyhow::Result<Config> {
    let lua = Lua::new();

    let config_dir = config_file_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .to_string_lossy();

    // Lets config.lua require() sibling files such as secrets.lua.
    lua.load(format!(
        r#"package.path = package.path .. ";{}/?.lua""#,
        config_dir
    ))
    .exec()?;

    let config_code = fs::read_to_string(config_file_path)?;
    let config_eval = lua.load(&config_code).eval()?;

    let required = |field: &str| {
        ConfigError::RequiredFieldNotFound(
            field.to_owned(),
            utils::path::contract_tilde(config_file_path),
        )
    };

    let Value::Table(config_tbl) = config_eval else {
        return Err(required("config.lua did not return a table!").into());
    };

    let source_tbl: Table = config_tbl
        .get::<_, Option<Table>>("source")?
        .ok_or_else(|| required("source"))?;
    let google_tbl: Table = source_tbl
        .get::<_, Option<Table>>("google")?
        .ok_or_else(|| required("source.google"))?;

    let oauth2_tbl: Table = google_tbl
        .get::<_, Option<Table>>("oauth2")?
        .ok_or_else(|| required("source.google.oauth2"))?;
    let client_id: String = oauth2_tbl
        .get::<_, Option<String>>("clientID")?
        .ok_or_else(|| required("source.google.oauth2.clientID"))?;
    let client_secret: String = oauth2_tbl
        .get::<_, Option<String>>("clientSecret")?
        .ok_or_else(|| required("source.google.oauth2.clientSecret"))?;
    let redirect_url: String = oauth2_tbl
        .get::<_, Option<String>>("redirectURL")?
        .unwrap_or(DEFAULT_REDIRECT_URL.to_string());
    let scopes: Vec<String> = match oauth2_tbl.get::<_, Option<Table>>("scopes")? {
        Some(table) => table.sequence_values().collect::<Result<_, _>>()?,
        None => DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
    };

    let spreadsheet_tbl: Table = google_tbl
        .get::<_, Option<Table>>("spreadsheet")?
        .ok_or_else(|| required("source.google.spreadsheet"))?;
    let spreadsheet_id: String = spreadsheet_tbl
        .get::<_, Option<String>>("spreadsheetID")?
        .ok_or_else(|| required("source.google.spreadsheet.spreadsheetID"))?;
    let settings_sheet: String = spreadsheet_tbl
        .get::<_, Option<String>>("settingsSheet")?
        .unwrap_or(DEFAULT_SETTINGS_SHEET.to_string());
    let schedule_sheet: String = spreadsheet_tbl
        .get::<_, Option<String>>("scheduleSheet")?
        .unwrap_or(DEFAULT_SCHEDULE_SHEET.to_string());

    let oauth_default_path = get_oauth_path()?;
    let settings = match config_tbl.get::<_, Option<Table>>("settings")? {
        Some(table) => Settings {
            oauth_file_path: table
                .get::<_, Option<String>>("oauthFilePath")?
                .unwrap_or(oauth_default_path.to_string_lossy().to_string()),
            tz: table
                .get::<_, Option<String>>("TZ")?
                .unwrap_or("UTC".to_string()),
        },
        None => Settings {
            oauth_file_path: oauth_default_path.to_string_lossy().to_string(),
            tz: "UTC".to_string(),
        },
    };

    Ok(Config {
        source: Source {
            google: GoogleSource {
                oauth2: GoogleOAuth2 {
                    client_id,
                    client_secret,
                    redirect_url,
                    scopes,
                },
                spreadsheet: GoogleSpreadsheet {
                    spreadsheet_id,
                    settings_sheet,
                    schedule_sheet,
                },
            },
        },
        settings,
    })
}
