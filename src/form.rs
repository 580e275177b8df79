use crate::error::InputError;
use crate::footprint::{non_negative, UsageInputs};
use std::io::{BufRead, Write};
use std::str::FromStr;

/// What the user typed after a cycle finished.
#[derive(Debug, PartialEq, Eq)]
pub enum Next {
    Again,
    Quit,
}

pub fn parse_field<T: FromStr>(field: &'static str, raw: &str) -> Result<T, InputError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| InputError::Unparsable { field, raw: raw.trim().to_string() })
}

/// clap value parser for the fractional inputs.
pub fn parse_non_negative(raw: &str) -> Result<f64, String> {
    parse_field::<f64>("value", raw)
        .and_then(|v| non_negative("value", v))
        .map_err(|e| e.to_string())
}

fn read_line<R: BufRead>(input: &mut R) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Prompts until the entry parses. Blank keeps the default. `None` on EOF.
fn ask<R, W, T, F>(input: &mut R, out: &mut W, label: &str, default: T, check: F) -> std::io::Result<Option<T>>
where
    R: BufRead,
    W: Write,
    T: Copy + std::fmt::Display,
    F: Fn(&str) -> Result<T, InputError>,
{
    loop {
        write!(out, "{} (default: {}): ", label, default)?;
        out.flush()?;
        let Some(line) = read_line(input)? else { return Ok(None) };
        if line.is_empty() {
            return Ok(Some(default));
        }
        match check(&line) {
            Ok(v) => return Ok(Some(v)),
            Err(e) => writeln!(out, "⚠️  {}", e)?,
        }
    }
}

pub fn read_inputs<R: BufRead, W: Write>(input: &mut R, out: &mut W, defaults: &UsageInputs) -> std::io::Result<Option<UsageInputs>> {
    writeln!(out, "🧾 Input Your Details")?;
    let Some(shower) = ask(input, out, "🚿 Daily Shower Time (in minutes)", defaults.shower_minutes_per_day, |s| {
        non_negative("shower minutes", parse_field("shower minutes", s)?)
    })?
    else { return Ok(None) };
    let Some(flushes) = ask(input, out, "🚽 Daily Toilet Flushes", defaults.toilet_flushes_per_day, |s| parse_field("toilet flushes", s))?
    else { return Ok(None) };
    let Some(laundry) = ask(input, out, "🧺 Weekly Laundry Loads", defaults.laundry_loads_per_week, |s| parse_field("laundry loads", s))?
    else { return Ok(None) };
    let Some(bottled) = ask(input, out, "💧 Weekly Bottled Water Consumption (Liters)", defaults.bottled_water_liters_per_week, |s| {
        non_negative("bottled water liters", parse_field("bottled water liters", s)?)
    })?
    else { return Ok(None) };
    Ok(Some(UsageInputs {
        shower_minutes_per_day: shower,
        toilet_flushes_per_day: flushes,
        laundry_loads_per_week: laundry,
        bottled_water_liters_per_week: bottled,
    }))
}

pub fn ask_next<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> std::io::Result<Next> {
    write!(out, "\nPress Enter to calculate again, or type q to quit: ")?;
    out.flush()?;
    match read_line(input)? {
        Some(l) if l.eq_ignore_ascii_case("q") || l.eq_ignore_ascii_case("quit") => Ok(Next::Quit),
        Some(_) => Ok(Next::Again),
        None => Ok(Next::Quit),
    }
}
