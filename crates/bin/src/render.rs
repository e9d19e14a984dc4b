//! Plain-text tables for terminal output.

use std::fmt::Write;

use fundview::{CikDirectory, CompanyReport, PriceField, PriceReport, Section, UnitChoice};

/// Growth rate as a signed percentage, `n/a` when undefined.
pub(crate) fn format_growth(rate: Option<f64>) -> String {
    rate.map_or_else(|| "n/a".to_string(), |r| format!("{:+.1}%", r))
}

fn section_title(name: &str) -> &str {
    match name {
        "net_income" => "Net income",
        "dividends" => "Dividends paid",
        other => other,
    }
}

fn write_section(out: &mut String, section: &Section, unit: UnitChoice) {
    let title = section_title(&section.name);

    let Some(data) = section.data.as_ref().filter(|d| !d.series.is_empty()) else {
        let _ = writeln!(out, "{title}: no annual data reported");
        return;
    };

    let scale = unit.resolve(&data.series.values());
    let label = if data.label.is_empty() {
        data.concept.as_str()
    } else {
        data.label.as_str()
    };
    let _ = writeln!(out, "{title} ({label}, {})", scale.label());
    let _ = writeln!(out, "  {:<6} {:>12} {:>10}", "Year", "Value", "Growth");

    for (record, point) in data.series.iter().zip(section.growth.iter()) {
        let _ = writeln!(
            out,
            "  {:<6} {:>12} {:>10}",
            record.year,
            scale.format(record.value),
            format_growth(point.rate)
        );
    }

    if let Some(summary) = &section.summary {
        let _ = writeln!(
            out,
            "  {}-{}: latest {}, mean growth {}, {} negative year(s)",
            summary.first_year,
            summary.last_year,
            scale.format(summary.latest),
            format_growth(summary.mean_growth),
            summary.negative_years
        );
    }
}

/// Renders both sections of a company report.
pub(crate) fn report_text(report: &CompanyReport, unit: UnitChoice) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", report.symbol);
    if let Some(note) = &report.note {
        let _ = writeln!(out, "{note}");
    }
    write_section(&mut out, &report.net_income, unit);
    write_section(&mut out, &report.dividends, unit);
    out
}

/// Renders a price column with its summary.
pub(crate) fn prices_text(report: &PriceReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} {} ==", report.symbol, report.field);

    let Some(summary) = &report.summary else {
        let _ = writeln!(out, "No {} values in range", report.field);
        return out;
    };

    let precision = if report.field == PriceField::Volume { 0 } else { 2 };
    let _ = writeln!(
        out,
        "{} to {}: first {:.p$}, last {:.p$}, low {:.p$}, high {:.p$}, change {}",
        summary.start,
        summary.end,
        summary.first,
        summary.last,
        summary.min,
        summary.max,
        format_growth(summary.change),
        p = precision
    );
    for point in &report.points {
        let _ = writeln!(out, "  {} {:>14.p$}", point.date, point.value, p = precision);
    }
    out
}

/// Lists the known ticker mappings.
pub(crate) fn tickers_text(directory: &CikDirectory) -> String {
    let mut out = String::new();
    for (symbol, cik) in directory.iter() {
        let _ = writeln!(out, "{:<8} {}", symbol, cik);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fundview::{
        AnnualRecord, AnnualSeries, ConceptSeries, FinancialFacts, PricePoint, PriceSummary,
        SeriesSummary, Symbol, growth,
    };

    fn d(y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, 12, 31).unwrap()
    }

    fn net_income_section() -> Section {
        let series = AnnualSeries::from_records(vec![
            AnnualRecord::new(d(2021), -1.0e9),
            AnnualRecord::new(d(2022), 3.0e9),
        ]);
        let growth = growth(&series);
        Section {
            name: "net_income".to_string(),
            summary: SeriesSummary::new(&series, &growth),
            data: Some(ConceptSeries {
                concept: "NetIncomeLoss".to_string(),
                label: "Net Income (Loss)".to_string(),
                description: String::new(),
                series,
            }),
            growth,
        }
    }

    #[test]
    fn test_format_growth() {
        assert_eq!(format_growth(None), "n/a");
        assert_eq!(format_growth(Some(400.0)), "+400.0%");
        assert_eq!(format_growth(Some(-12.34)), "-12.3%");
    }

    #[test]
    fn test_report_text() {
        let mut report = CompanyReport::from_facts(Symbol::new("TSLA"), &FinancialFacts::default());
        report.net_income = net_income_section();

        let text = report_text(&report, UnitChoice::Auto);
        assert!(text.starts_with("== TSLA =="));
        assert!(text.contains("Net income (Net Income (Loss), USD (Billions))"));
        assert!(text.contains("-1.0B"));
        assert!(text.contains("+400.0%"));
        assert!(text.contains("1 negative year(s)"));
        assert!(text.contains("Dividends paid: no annual data reported"));
    }

    #[test]
    fn test_report_text_fixed_unit() {
        let mut report = CompanyReport::from_facts(Symbol::new("TSLA"), &FinancialFacts::default());
        report.net_income = net_income_section();

        let text = report_text(&report, "M".parse().unwrap());
        assert!(text.contains("3000M"));
    }

    #[test]
    fn test_report_text_with_note() {
        let mut report = CompanyReport::from_facts(Symbol::new("ZZZZ"), &FinancialFacts::default());
        report.note = Some("No company identifier known for ZZZZ".to_string());

        let text = report_text(&report, UnitChoice::Auto);
        assert!(text.contains("No company identifier known for ZZZZ"));
        assert!(text.contains("Net income: no annual data reported"));
    }

    #[test]
    fn test_prices_text() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let report = PriceReport {
            symbol: Symbol::new("AAPL"),
            field: PriceField::Close,
            points: vec![PricePoint { date, value: 185.64 }],
            summary: Some(PriceSummary {
                field: PriceField::Close,
                start: date,
                end: date,
                first: 185.64,
                last: 185.64,
                min: 185.64,
                max: 185.64,
                change: Some(0.0),
            }),
        };

        let text = prices_text(&report);
        assert!(text.contains("== AAPL close =="));
        assert!(text.contains("2024-01-02         185.64"));
        assert!(text.contains("change +0.0%"));
    }

    #[test]
    fn test_prices_text_empty() {
        let report = PriceReport {
            symbol: Symbol::new("AAPL"),
            field: PriceField::Volume,
            points: Vec::new(),
            summary: None,
        };
        assert!(prices_text(&report).contains("No volume values in range"));
    }

    #[test]
    fn test_tickers_text() {
        let text = tickers_text(&CikDirectory::builtin());
        assert!(text.contains("AAPL     0000320193"));
    }
}
