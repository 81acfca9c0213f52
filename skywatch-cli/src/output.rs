use std::fmt::Write;

use chrono::{DateTime, Utc};
use skywatch_core::{
    ForecastResult, ForecastStep, NominatimLocation, SevereWeatherAlert, SunResult,
    metno::sun::SunEvent,
};

const MISSING: &str = "-";

pub fn render_forecast(result: &ForecastResult, limit: usize) -> String {
    let steps = result.steps();
    if steps.is_empty() {
        return "No forecast data returned for this location.\n".to_string();
    }

    let mut out = String::new();
    if let Some(updated) = result
        .properties
        .as_ref()
        .and_then(|p| p.meta.as_ref())
        .and_then(|m| m.updated_at)
    {
        let _ = writeln!(out, "Updated {}", format_time(Some(updated)));
    }

    let _ = writeln!(
        out,
        "{:<17}  {:>7}  {:>8}  {:>9}  {}",
        "time (UTC)", "temp", "wind", "precip", "conditions"
    );
    for step in steps.iter().take(limit) {
        let _ = writeln!(out, "{}", format_step(step));
    }

    out
}

fn format_step(step: &ForecastStep) -> String {
    let temp = opt_unit(step.temperature_c, "°C");
    let wind = opt_unit(step.wind_speed_mps, "m/s");
    let precip = match (step.precipitation_mm, step.period) {
        (Some(mm), Some(period)) => format!("{mm:.1}mm/{}h", period.hours()),
        (Some(mm), None) => format!("{mm:.1}mm"),
        (None, _) => MISSING.to_string(),
    };
    let symbol = step.symbol_code.as_deref().unwrap_or(MISSING);

    format!(
        "{:<17}  {:>7}  {:>8}  {:>9}  {}",
        format_time(step.time),
        temp,
        wind,
        precip,
        symbol
    )
}

/// One line of sun times in the location's own offset.
pub fn render_sun(sun: &SunResult) -> String {
    let Some(props) = &sun.properties else {
        return String::new();
    };

    let sunrise = props.sunrise.as_ref().map(format_sun_event);
    let sunset = props.sunset.as_ref().map(format_sun_event);
    match (sunrise, sunset) {
        (None, None) => {
            let up = props.solarnoon.as_ref().and_then(|n| n.visible);
            match up {
                Some(true) => "Sun up all day\n".to_string(),
                Some(false) => "Sun down all day\n".to_string(),
                None => String::new(),
            }
        }
        (rise, set) => format!(
            "Sunrise {}  Sunset {}\n",
            rise.as_deref().unwrap_or(MISSING),
            set.as_deref().unwrap_or(MISSING)
        ),
    }
}

fn format_sun_event(event: &SunEvent) -> String {
    match event.local_time() {
        Some(t) => t.format("%H:%M").to_string(),
        None => event.time.clone().unwrap_or_else(|| MISSING.to_string()),
    }
}

pub fn render_locations(places: &[NominatimLocation]) -> String {
    if places.is_empty() {
        return "No matching places.\n".to_string();
    }

    let mut out = String::new();
    for place in places {
        let name = place
            .display_name
            .as_deref()
            .or(place.locality())
            .unwrap_or("(unnamed)");
        match place.coordinates() {
            Some((lat, lon)) => {
                let _ = writeln!(out, "{lat:>9.4} {lon:>10.4}  {name}");
            }
            None => {
                let _ = writeln!(out, "{:>9} {:>10}  {name}", MISSING, MISSING);
            }
        }
    }

    out
}

pub fn render_alerts(region: &str, alerts: &[SevereWeatherAlert]) -> String {
    if alerts.is_empty() {
        return format!("No active alerts for {region}.\n");
    }

    let mut out = String::new();
    let _ = writeln!(out, "{} alert(s) for {region}:", alerts.len());
    for alert in alerts {
        let severity = alert.severity.as_deref().unwrap_or("Unknown");
        let title = alert.title().unwrap_or("(untitled)");
        let _ = writeln!(out, "\n[{severity}] {title}");

        if let Some(area) = &alert.area_desc {
            let _ = writeln!(out, "  Area:    {area}");
        }
        match (&alert.onset, &alert.expires) {
            (Some(onset), Some(expires)) => {
                let _ = writeln!(out, "  Valid:   {onset} .. {expires}");
            }
            (None, Some(expires)) => {
                let _ = writeln!(out, "  Expires: {expires}");
            }
            _ => {}
        }
        if let Some(sender) = &alert.sender_name {
            let _ = writeln!(out, "  Issuer:  {sender}");
        }
        if let Some(url) = alert.url.as_ref().or(alert.cap_url.as_ref()) {
            let _ = writeln!(out, "  Link:    {url}");
        }
    }

    out
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

fn opt_unit(value: Option<f64>, unit: &str) -> String {
    value
        .map(|v| format!("{v:.1}{unit}"))
        .unwrap_or_else(|| MISSING.to_string())
}
