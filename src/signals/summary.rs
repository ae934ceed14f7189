// =============================================================================
// Summary text and reference links
// =============================================================================
//
// Layout (Discord-flavoured markdown):
//
//   <name>
//   ```
//   open     12.34
//   close    12.34
//   high     12.34
//   low      12.34
//   bb_upper 12.34      <- bands-only variant
//   bb_lower 12.34      <- bands-only variant
//   ```
//   <quote link>
//   <listing link>      <- once per fired direction
//
// Numbers are always formatted with two decimals and a dot separator.
// =============================================================================

use std::fmt::Write;

use crate::market_data::Bar;
use crate::runtime_config::LinkTemplates;
use crate::types::{BreakoutDirection, Instrument};

/// Values shown in the fenced block besides the last bar's OHLC.
pub struct BandValues {
    pub upper: Option<f64>,
    pub lower: Option<f64>,
}

/// Render the summary for `instrument`.
///
/// `bands` is `Some` only for the bands-only variant.  `directions` lists the
/// breakouts that fired, in the order their links should appear.
pub fn render_summary(
    instrument: &Instrument,
    last: &Bar,
    bands: Option<&BandValues>,
    directions: &[BreakoutDirection],
    links: &LinkTemplates,
) -> String {
    let mut out = String::new();

    out.push_str(&instrument.name);
    out.push_str("\n```\n");
    push_row(&mut out, "open", Some(last.open));
    push_row(&mut out, "close", Some(last.close));
    push_row(&mut out, "high", Some(last.high));
    push_row(&mut out, "low", Some(last.low));
    if let Some(b) = bands {
        push_row(&mut out, "bb_upper", b.upper);
        push_row(&mut out, "bb_lower", b.lower);
    }
    out.push_str("```\n");

    let quote = links.quote.replace("{symbol}", &instrument.chart_symbol);
    let _ = write!(out, "<{quote}>");

    for &direction in directions {
        let _ = write!(out, "\n<{}>", listing_link(links, direction, &instrument.name));
    }

    out
}

/// Certificate listing link for one breakout direction.
pub fn listing_link(links: &LinkTemplates, direction: BreakoutDirection, name: &str) -> String {
    links
        .listing
        .replace("{direction}", direction.listing_code())
        .replace("{name}", &quote_component(name))
}

fn push_row(out: &mut String, label: &str, value: Option<f64>) {
    let _ = match value {
        Some(v) => writeln!(out, "{label:<9}{v:>4.2}"),
        None => writeln!(out, "{label:<9}{:>4}", "n/a"),
    };
}

/// Percent-escape `s` for use inside a URL.
///
/// Keeps ASCII alphanumerics, `-`, `_`, `.`, `~` and `/`; every other UTF-8
/// byte becomes `%XX` (uppercase hex).
pub fn quote_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~' | b'/') {
            out.push(b as char);
        } else {
            let _ = write!(out, "%{b:02X}");
        }
    }
    out
}
