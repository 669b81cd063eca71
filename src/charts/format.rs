//! Human-readable magnitudes for chart labels.

/// Decimal prefixes for dimensionless counts.
const COUNT_UNITS: &[&str] = &["", "k", "M", "G", "T", "P", "E"];

/// Binary prefixes for byte quantities.
const BYTE_UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// Formats numeric magnitudes into display strings.
///
/// Chart builders take a formatter so the label wording stays independent
/// of how numbers are rendered.
pub trait UnitFormatter: Send + Sync {
    /// Format a dimensionless count (operations, PGs, objects).
    fn count(&self, value: f64) -> String;

    /// Format a byte quantity.
    fn bytes(&self, value: f64) -> String;
}

/// Default formatter: `80`, `1.5 k`, `1000 B`, `2 GiB`.
///
/// Values below the unit base print as whole numbers. Larger values are
/// scaled and print with one decimal, without a trailing `.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DimlessFormatter;

impl UnitFormatter for DimlessFormatter {
    fn count(&self, value: f64) -> String {
        scale(value, 1000.0, COUNT_UNITS)
    }

    fn bytes(&self, value: f64) -> String {
        scale(value, 1024.0, BYTE_UNITS)
    }
}

fn scale(value: f64, base: f64, units: &[&str]) -> String {
    let mut value = if value.is_finite() { value } else { 0.0 };
    let mut unit = 0;
    // Compare the displayed value, so 999.6 reads "1 k" rather than "1000".
    while displayed(value, unit).abs() >= base && unit < units.len() - 1 {
        value /= base;
        unit += 1;
    }

    let number = if unit == 0 {
        format!("{}", value.round() as i64)
    } else {
        let fixed = format!("{:.1}", value);
        match fixed.strip_suffix(".0") {
            Some(whole) => whole.to_string(),
            None => fixed,
        }
    };

    match units[unit] {
        "" => number,
        suffix => format!("{} {}", number, suffix),
    }
}

/// The value as it will print: whole numbers without a prefix, one decimal
/// with one.
fn displayed(value: f64, unit: usize) -> f64 {
    if unit == 0 {
        value.round()
    } else {
        (value * 10.0).round() / 10.0
    }
}
