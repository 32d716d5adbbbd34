//! Settings operation: validate user-typed fields, then persist them.
//!
//! Every supplied field is parsed before the store is touched, so a single
//! bad field rejects the whole change and leaves the record as it was.

use crate::countdown::{CountdownTargets, local_now};
use crate::error::{ClockError, Result};
use crate::store::{ClockConfig, ConfigStore, DATE_FORMAT};
use chrono::NaiveDate;
use tracing::info;

/// Raw settings text as typed into a dialog or passed on the command line.
///
/// `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsInput {
    /// `YYYY-MM-DD`.
    pub birth_date: Option<String>,
    /// Positive whole number of years.
    pub life_expectancy_years: Option<String>,
    /// Free text.
    pub theme_name: Option<String>,
    /// `YYYY-MM-DD`.
    pub theme_end_date: Option<String>,
}

/// Parsed, validated counterpart of [`SettingsInput`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub birth_date: Option<NaiveDate>,
    pub life_expectancy_years: Option<u32>,
    pub theme_name: Option<String>,
    pub theme_end_date: Option<NaiveDate>,
}

impl SettingsInput {
    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.birth_date.is_none()
            && self.life_expectancy_years.is_none()
            && self.theme_name.is_none()
            && self.theme_end_date.is_none()
    }

    /// Parse and validate every supplied field.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidSettingsInput`] for a malformed date or a
    /// life expectancy that is not a positive integer fitting in `u32`.
    pub fn parse(&self) -> Result<SettingsUpdate> {
        Ok(SettingsUpdate {
            birth_date: self
                .birth_date
                .as_deref()
                .map(|raw| parse_date("birth_date", raw))
                .transpose()?,
            life_expectancy_years: self
                .life_expectancy_years
                .as_deref()
                .map(parse_years)
                .transpose()?,
            theme_name: self.theme_name.clone(),
            theme_end_date: self
                .theme_end_date
                .as_deref()
                .map(|raw| parse_date("theme_end_date", raw))
                .transpose()?,
        })
    }
}

impl SettingsUpdate {
    /// Overwrite the fields this update carries.
    pub fn apply_to(&self, config: &mut ClockConfig) {
        if let Some(date) = self.birth_date {
            config.birth_date = date;
        }
        if let Some(years) = self.life_expectancy_years {
            config.life_expectancy_years = years;
        }
        if let Some(name) = &self.theme_name {
            config.theme_name.clone_from(name);
        }
        if let Some(date) = self.theme_end_date {
            config.theme_end_date = date;
        }
    }
}

/// Validate `input`, persist it and return the recomputed countdown targets.
///
/// # Errors
///
/// - [`ClockError::InvalidSettingsInput`] if any field is rejected; the store
///   is left untouched.
/// - [`ClockError::ConfigWriteFailed`] if persisting fails; the running
///   process already uses the new values.
pub fn apply_settings(store: &ConfigStore, input: &SettingsInput) -> Result<CountdownTargets> {
    let update = input.parse()?;
    let config = store.update(|config| update.apply_to(config))?;
    info!(
        birth_date = %config.birth_date,
        life_expectancy_years = config.life_expectancy_years,
        theme_name = %config.theme_name,
        theme_end_date = %config.theme_end_date,
        "settings saved"
    );
    Ok(CountdownTargets::from_config(&config, local_now()))
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|e| {
        ClockError::InvalidSettingsInput(format!("{field} '{raw}' is not a YYYY-MM-DD date: {e}"))
    })
}

fn parse_years(raw: &str) -> Result<u32> {
    let years: i64 = raw.trim().parse().map_err(|_| {
        ClockError::InvalidSettingsInput(format!(
            "life_expectancy_years '{raw}' is not a whole number"
        ))
    })?;
    if years <= 0 {
        return Err(ClockError::InvalidSettingsInput(format!(
            "life_expectancy_years must be positive, got {years}"
        )));
    }
    u32::try_from(years).map_err(|_| {
        ClockError::InvalidSettingsInput(format!("life_expectancy_years {years} is too large"))
    })
}
