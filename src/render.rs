//! Plain-text rendering of a report for the terminal

use chrono_tz::Tz;

use crate::models::{TideEvent, TideOutlook};
use crate::providers::ProviderOutcome;
use crate::report::{BeachReport, LocationReport};

const TIDE_UNAVAILABLE: &str = "Tide data unavailable";

/// Render everything except the travel guide, which is streamed separately
pub fn render_report(report: &LocationReport, timezone: Tz) -> String {
    let mut lines = Vec::new();
    let weather = &report.weather;

    lines.push(format!(
        "📍 {} ({})",
        report.location.formatted_address,
        report.location.format_coordinates()
    ));
    if let Some(distance) = report.distance_km {
        lines.push(format!("✈️ Flight distance: {distance:.0} km"));
    }
    lines.push(String::new());

    lines.push("🌤️ Current Weather".to_string());
    if let Some(notice) = &report.weather_notice {
        lines.push(format!("  ⚠ Live weather unavailable, showing typical conditions ({notice})"));
    }
    lines.push(format!("  Temperature: {}", weather.format_temperature()));
    lines.push(format!("  Conditions:  {}", weather.conditions));
    lines.push(format!("  Wind Speed:  {}", weather.format_wind()));
    lines.push(format!("  Humidity:    {}", weather.format_humidity()));
    lines.push(String::new());

    lines.push("📅 Today's Forecast".to_string());
    lines.push(format!("  {}", weather.format_forecast()));
    lines.push(String::new());

    lines.push("⚠️ Is It Safe to Visit?".to_string());
    lines.push(format!(
        "  Safety Rating: {} ({})",
        report.safety.format_score(),
        report.safety.label
    ));
    for adjustment in &report.safety.adjustments {
        lines.push(format!("    {} {:+.1}", adjustment.rule, adjustment.delta));
    }
    lines.push(String::new());

    lines.push("🧳 What to Carry".to_string());
    lines.extend(report.packing_advice.lines().map(|line| format!("  {line}")));

    if let Some(beach) = &report.beach {
        lines.push(String::new());
        render_beach(&mut lines, beach, timezone);
    }

    lines.join("\n")
}

fn render_beach(lines: &mut Vec<String>, beach: &BeachReport, timezone: Tz) {
    lines.push("🏖️ Beach Safety Report".to_string());
    lines.push(format!(
        "  Beach Safety Score: {}/10 | UV Risk: {}",
        beach.safety.score, beach.safety.uv_risk
    ));
    if !beach.safety.hazards.is_empty() {
        lines.push(format!("  Hazards: {}", beach.safety.hazards.join(", ")));
    }
    if !beach.facilities.is_empty() {
        lines.push(format!("  Facilities: {}", beach.facilities.join(", ")));
    }
    lines.push(String::new());

    lines.push("🌊 Tide Information".to_string());
    lines.extend(render_tides(&beach.tides, timezone));
    lines.push(String::new());

    lines.push("💧 Water Quality".to_string());
    lines.push(format!(
        "  Swimming Safety: {} ({})",
        beach.water_quality, beach.swimming_advice
    ));
    lines.push(String::new());

    lines.push("🧳 Beach Packing Essentials".to_string());
    lines.extend(beach.packing_list.iter().map(|item| format!("  - {item}")));
}

fn render_tides(tides: &ProviderOutcome<TideOutlook>, timezone: Tz) -> Vec<String> {
    let outlook = match tides {
        ProviderOutcome::Ok(outlook) | ProviderOutcome::Fallback { value: outlook, .. } => outlook,
        ProviderOutcome::Error(message) => return vec![format!("  ⚠ {message}")],
    };
    if outlook.is_empty() {
        return vec![format!("  ⚠ {TIDE_UNAVAILABLE}")];
    }

    let mut lines = Vec::new();
    if let Some(high) = &outlook.next_high {
        lines.push(format!("  Next High Tide: {}", tide_line(high, timezone)));
    }
    if let Some(low) = &outlook.next_low {
        lines.push(format!("  Next Low Tide:  {}", tide_line(low, timezone)));
    }
    lines
}

fn tide_line(event: &TideEvent, timezone: Tz) -> String {
    format!(
        "{} ({})",
        event.time.with_timezone(&timezone).format("%H:%M"),
        event.format_height()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ResolvedLocation, TideKind, WeatherObservation};
    use crate::providers::WaterQuality;
    use crate::scoring::{assess_beach_safety, compute_safety_score};
    use chrono::{TimeZone, Utc};

    fn report(beach: Option<BeachReport>) -> LocationReport {
        let weather = WeatherObservation::fallback();
        LocationReport {
            query: "Puri Beach".to_string(),
            location: ResolvedLocation::new(19.7983, 85.8249, "Puri Beach, Odisha, India".into()),
            safety: compute_safety_score(&weather),
            weather,
            weather_notice: None,
            packing_advice: "- 🧴 Sunscreen\n- 🩱 Swimwear".to_string(),
            beach,
            distance_km: None,
            generated_at: Utc.with_ymd_and_hms(2026, 3, 14, 6, 30, 0).unwrap(),
        }
    }

    fn beach(tides: ProviderOutcome<TideOutlook>) -> BeachReport {
        BeachReport {
            tides,
            facilities: vec!["Lifeguard".to_string()],
            water_quality: WaterQuality::Good,
            swimming_advice: WaterQuality::Good.advice().to_string(),
            safety: assess_beach_safety(6.5, &["Cyclone watch"], true),
            packing_list: vec!["🧴 SPF 50+ Sunscreen".to_string()],
        }
    }

    #[test]
    fn test_city_report_sections() {
        let text = render_report(&report(None), chrono_tz::Asia::Kolkata);
        assert!(text.contains("📍 Puri Beach, Odisha, India (19.7983, 85.8249)"));
        assert!(text.contains("Temperature: 28.0°C"));
        assert!(text.contains("High: 32.0°C | Low: 26.0°C"));
        assert!(text.contains("Safety Rating: 8.0/10 (Very Safe)"));
        assert!(text.contains("  - 🩱 Swimwear"));
        assert!(!text.contains("Beach Safety Report"));
    }

    #[test]
    fn test_fallback_notice_is_shown() {
        let mut report = report(None);
        report.weather_notice = Some("operation timed out".to_string());
        let text = render_report(&report, chrono_tz::Asia::Kolkata);
        assert!(text.contains("typical conditions (operation timed out)"));
    }

    #[test]
    fn test_tide_times_in_display_timezone() {
        let outlook = TideOutlook {
            next_high: Some(TideEvent {
                kind: TideKind::High,
                time: Utc.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap(),
                height_m: Some(1.134),
            }),
            next_low: None,
        };
        let text = render_report(
            &report(Some(beach(ProviderOutcome::Ok(outlook)))),
            chrono_tz::Asia::Kolkata,
        );

        assert!(text.contains("Next High Tide: 15:30 (1.13m)"));
        assert!(!text.contains("Next Low Tide"));
        assert!(text.contains("Beach Safety Score: 6/10 | UV Risk: High"));
        assert!(text.contains("Hazards: Cyclone watch"));
        assert!(text.contains("Swimming Safety: Good (Safe for swimming)"));
    }

    #[test]
    fn test_tide_error_is_shown() {
        let text = render_report(
            &report(Some(beach(ProviderOutcome::Error(
                "No Storm Glass API key configured".to_string(),
            )))),
            chrono_tz::Asia::Kolkata,
        );
        assert!(text.contains("⚠ No Storm Glass API key configured"));
    }

    #[test]
    fn test_no_upcoming_tides() {
        let text = render_report(
            &report(Some(beach(ProviderOutcome::Ok(TideOutlook::default())))),
            chrono_tz::Asia::Kolkata,
        );
        assert!(text.contains("⚠ Tide data unavailable"));
    }
}
