use crate::config::{self, Config};
use crate::core::event::ScheduleEvent;
use crate::core::schedule::{build_render_plan, ScheduleView};
use crate::core::settings::{ScheduleSettings, SETTINGS_RANGE};
use crate::core::window::{FetchWindow, FetchWindowCalculator, RealClock};
use crate::google::calendar::client::GoogleCalendarClient;
use crate::google::calendar::model::EventItem;
use crate::google::oauth::{OAuth2Client, Token};
use crate::google::sheets::client::{GoogleSheetsClient, GoogleSheetsError};
use crate::shared::utils::date::to_utc_midnight_rfc3339;
use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use futures::future;
use log::{debug, info};
use std::fmt;
use std::fs;
use std::path::Path;

pub struct Cal2Grid {
    config: Config,
    token: Option<Token>,
}

/// What one rendering pass did, for the CLI to print.
#[derive(Debug)]
pub struct RenderSummary {
    pub today: NaiveDate,
    pub days_total: i64,
    pub events: usize,
    pub holidays: usize,
    pub ops: usize,
    pub requests: usize,
    pub dry_run: bool,
}

impl fmt::Display for RenderSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dry_run {
            write!(
                f,
                "dry run: planned {} ops for {} day(s) around {} ({} events, {} holidays)",
                self.ops, self.days_total, self.today, self.events, self.holidays
            )
        } else {
            write!(
                f,
                "painted {} day(s) around {} with {} events and {} holidays ({} ops, {} requests)",
                self.days_total, self.today, self.events, self.holidays, self.ops, self.requests
            )
        }
    }
}

impl Cal2Grid {
    pub fn new() -> anyhow::Result<Self> {
        match config::init() {
            Ok(config) => Ok(Self {
                config,
                token: None,
            }),
            Err(e) => Err(e),
        }
    }

    pub async fn oauth(&mut self) -> anyhow::Result<()> {
        let oauth2_client = OAuth2Client::new(
            &self.config.source.google.oauth2.client_id,
            &self.config.source.google.oauth2.client_secret,
            &self.config.source.google.oauth2.redirect_url,
        );
        let scopes = &self.config.source.google.oauth2.scopes;

        let token = match fs::read_to_string(&self.config.settings.oauth_file_path) {
            Ok(content) => {
                let stored = serde_json::from_str::<Token>(&content)?;

                if stored.is_expired() {
                    if let Some(ref refresh) = stored.refresh_token {
                        let mut refreshed = oauth2_client.refresh_token(refresh.clone()).await?;
                        // Google omits the refresh token on refresh responses.
                        if refreshed.refresh_token.is_none() {
                            refreshed.refresh_token = Some(refresh.clone());
                        }
                        self.save_token(&refreshed)?;
                        refreshed
                    } else {
                        let token = oauth2_client.oauth_flow(scopes).await?;
                        self.save_token(&token)?;
                        token
                    }
                } else {
                    stored
                }
            }
            Err(_) => {
                let new_token = oauth2_client.oauth_flow(scopes).await?;
                self.save_token(&new_token)?;
                new_token
            }
        };

        self.token = Some(token);

        Ok(())
    }

    fn save_token(&self, token: &Token) -> anyhow::Result<()> {
        let path = Path::new(&self.config.settings.oauth_file_path);
        let dir = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("oauth file path has no parent directory"))?;
        fs::create_dir_all(dir)?;
        fs::write(path, serde_json::to_string_pretty(token)?)?;
        Ok(())
    }

    fn access_token(&self) -> anyhow::Result<String> {
        Ok(self
            .token
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("token not set; run the OAuth flow first"))?
            .access_token
            .clone())
    }

    /// One full pass: read settings, fetch both calendars, build the paint
    /// plan and apply it to the schedule sheet. With `reference` set, renders
    /// the grid as of that date instead of today; with `dry_run`, prints the
    /// plan instead of applying it.
    pub async fn render(
        &self,
        reference: Option<NaiveDate>,
        dry_run: bool,
    ) -> anyhow::Result<RenderSummary> {
        let tz: Tz =
            self.config.settings.tz.parse().unwrap_or_else(|_| {
                panic!("Invalid time zone string '{}'", self.config.settings.tz)
            });

        let access_token = self.access_token()?;
        let sheets_client = GoogleSheetsClient::new(access_token.clone());
        let spreadsheet_cfg = &self.config.source.google.spreadsheet;

        let spreadsheet = sheets_client
            .fetch_spreadsheet(&spreadsheet_cfg.spreadsheet_id)
            .await?;

        if spreadsheet
            .sheet_titled(&spreadsheet_cfg.settings_sheet)
            .is_none()
        {
            return Err(
                GoogleSheetsError::SheetNotFound(spreadsheet_cfg.settings_sheet.clone()).into(),
            );
        }
        let schedule_props = spreadsheet
            .sheet_titled(&spreadsheet_cfg.schedule_sheet)
            .ok_or_else(|| {
                GoogleSheetsError::SheetNotFound(spreadsheet_cfg.schedule_sheet.clone())
            })?;
        let current_columns = schedule_props
            .grid_properties
            .as_ref()
            .and_then(|props| props.column_count)
            .ok_or_else(|| anyhow::anyhow!("schedule sheet reports no column count"))?;

        let value_range = sheets_client
            .read_range(
                &spreadsheet_cfg.spreadsheet_id,
                &spreadsheet_cfg.settings_sheet,
                SETTINGS_RANGE,
            )
            .await?;
        let settings = ScheduleSettings::from_cells(value_range.rows())?;

        let window = match reference {
            Some(today) => FetchWindow::around(today, settings.days_back, settings.days_fw),
            None => FetchWindowCalculator::new(RealClock).window(
                &tz,
                settings.days_back,
                settings.days_fw,
            ),
        };

        let since_rfc3339 = to_utc_midnight_rfc3339(window.since, &tz);
        let until_rfc3339 = to_utc_midnight_rfc3339(window.until_exclusive, &tz);

        info!(
            "fetching events in [{}, {}) around {}",
            window.since, window.until_exclusive, window.today
        );

        let calendar_client = GoogleCalendarClient::new(access_token);
        let (events_result, holidays_result) = future::join(
            calendar_client.fetch_calendar_events(
                &settings.calendar_id,
                &since_rfc3339,
                &until_rfc3339,
            ),
            calendar_client.fetch_calendar_events(
                &settings.holidays_calendar_id,
                &since_rfc3339,
                &until_rfc3339,
            ),
        )
        .await;

        let events_response = events_result
            .with_context(|| format!("fetching events from '{}'", settings.calendar_id))?;
        let holidays_response = holidays_result.with_context(|| {
            format!(
                "fetching holidays from '{}'",
                settings.holidays_calendar_id
            )
        })?;

        let events = events_from_items(&events_response.items, &tz);
        let holidays = events_from_items(&holidays_response.items, &tz);

        let view = ScheduleView {
            today: window.today,
            days_back: settings.days_back,
            days_fw: settings.days_fw,
            current_columns,
        };
        let plan = build_render_plan(&view, &events, &holidays);

        let mut summary = RenderSummary {
            today: window.today,
            days_total: view.days_total(),
            events: events.len(),
            holidays: holidays.len(),
            ops: plan.len(),
            requests: 0,
            dry_run,
        };

        if dry_run {
            for op in &plan.ops {
                println!("{}", op);
            }
            return Ok(summary);
        }

        summary.requests = sheets_client
            .apply_plan(
                &spreadsheet_cfg.spreadsheet_id,
                schedule_props.sheet_id,
                &plan,
            )
            .await?;

        Ok(summary)
    }
}

/// Converts API items into schedule events in the grid's local time.
/// Cancelled stubs and items without usable times are dropped.
fn events_from_items(items: &[EventItem], tz: &Tz) -> Vec<ScheduleEvent> {
    let mut events = Vec::with_capacity(items.len());
    for item in items {
        if item.is_cancelled() {
            continue;
        }
        let title = item
            .summary
            .clone()
            .unwrap_or_else(|| "(no title)".to_string());
        let Some((start, end)) = local_times(item, tz) else {
            debug!("skipping '{}': no usable start/end time", title);
            continue;
        };
        events.push(ScheduleEvent { title, start, end });
    }
    events
}

fn local_times(item: &EventItem, tz: &Tz) -> Option<(NaiveDateTime, NaiveDateTime)> {
    if item.is_all_day() {
        let start = item.start_date()?.and_hms_opt(0, 0, 0)?;
        let end = item.end_date()?.and_hms_opt(0, 0, 0)?;
        Some((start, end))
    } else {
        let start = item.start_time_utc()?.with_timezone(tz).naive_local();
        let end = item.end_time_utc()?.with_timezone(tz).naive_local();
        Some((start, end))
    }
}
