//! Rendering of message templates with named arguments.
//!
//! [`MessageFormatter`] is the seam bound accessors format through.
//! [`IcuFormatter`] is the built-in implementation: it renders the template
//! subset parsed by [`crate::template`] and caches each compiled template
//! behind an `Arc`, so one compiled template is shared by every thread that
//! formats the same message.

use crate::bundle::Locale;
use crate::template::{Format, Part, PluralSelector, Template};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

/// A value passed to a message accessor.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageArg {
    Text(String),
    Number(f64),
    Temporal(NaiveDateTime),
    Null,
}

impl MessageArg {
    fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for MessageArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => f.write_str(&plain_number(*n)),
            Self::Temporal(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S")),
            Self::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for MessageArg {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MessageArg {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for MessageArg {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<bool> for MessageArg {
    fn from(value: bool) -> Self {
        Self::Text(value.to_string())
    }
}

macro_rules! numeric_args {
    ($($ty:ty),*) => {
        $(impl From<$ty> for MessageArg {
            fn from(value: $ty) -> Self {
                Self::Number(value as f64)
            }
        })*
    };
}

numeric_args!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<NaiveDateTime> for MessageArg {
    fn from(value: NaiveDateTime) -> Self {
        Self::Temporal(value)
    }
}

impl From<NaiveDate> for MessageArg {
    fn from(value: NaiveDate) -> Self {
        Self::Temporal(value.and_time(NaiveTime::MIN))
    }
}

impl<Tz: chrono::TimeZone> From<chrono::DateTime<Tz>> for MessageArg {
    fn from(value: chrono::DateTime<Tz>) -> Self {
        Self::Temporal(value.naive_local())
    }
}

impl<T: Into<MessageArg>> From<Option<T>> for MessageArg {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Named arguments for one formatting call.
pub type NamedArgs = HashMap<String, MessageArg>;

/// Formats a message template with named arguments.
pub trait MessageFormatter: Send + Sync {
    fn format(&self, template: &str, locale: &Locale, args: &NamedArgs) -> String;
}

/// Built-in formatter for the ICU MessageFormat subset.
#[derive(Debug, Default)]
pub struct IcuFormatter {
    compiled: RwLock<HashMap<String, Arc<Template>>>,
}

impl IcuFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `source`, or reuse an earlier compilation of the same text.
    ///
    /// A template that fails to parse is kept as literal text.
    pub fn compile(&self, source: &str) -> Arc<Template> {
        if let Some(template) = self.compiled.read().unwrap().get(source) {
            return Arc::clone(template);
        }

        let template = match Template::parse(source) {
            Ok(template) => template,
            Err(err) => {
                tracing::error!(template = source, %err, "malformed message template");
                Template {
                    parts: vec![Part::Text(source.to_string())],
                }
            }
        };
        let mut compiled = self.compiled.write().unwrap();
        Arc::clone(
            compiled
                .entry(source.to_string())
                .or_insert_with(|| Arc::new(template)),
        )
    }

    fn render(&self, template: &Template, locale: &Locale, args: &NamedArgs, pound: Option<f64>, out: &mut String) {
        for part in &template.parts {
            match part {
                Part::Text(text) => out.push_str(text),
                Part::Pound => match pound {
                    Some(n) => out.push_str(&format_number(n, None, locale)),
                    None => out.push('#'),
                },
                Part::Placeholder(placeholder) => {
                    let Some(arg) = args.get(&placeholder.name) else {
                        out.push('{');
                        out.push_str(&placeholder.name);
                        out.push('}');
                        continue;
                    };
                    match &placeholder.format {
                        Format::None => match arg {
                            MessageArg::Number(n) => out.push_str(&format_number(*n, None, locale)),
                            other => out.push_str(&other.to_string()),
                        },
                        Format::Simple { keyword, style } => {
                            self.render_simple(keyword, style.as_deref(), arg, locale, args, out);
                        }
                        Format::Plural {
                            ordinal,
                            offset,
                            cases,
                        } => {
                            let Some(n) = arg.as_number() else {
                                out.push_str(&arg.to_string());
                                continue;
                            };
                            let adjusted = n - offset;
                            let exact = cases.iter().find(
                                |c| matches!(c.selector, PluralSelector::Exact(v) if v == n),
                            );
                            let category = if *ordinal {
                                ordinal_category(locale, adjusted)
                            } else {
                                plural_category(locale, adjusted)
                            };
                            let chosen = exact
                                .or_else(|| {
                                    cases.iter().find(|c| {
                                        matches!(&c.selector, PluralSelector::Keyword(k) if k == category)
                                    })
                                })
                                .or_else(|| {
                                    cases.iter().find(|c| {
                                        matches!(&c.selector, PluralSelector::Keyword(k) if k == "other")
                                    })
                                });
                            if let Some(case) = chosen {
                                self.render(&case.message, locale, args, Some(adjusted), out);
                            }
                        }
                        Format::Select { cases } => {
                            let value = arg.to_string();
                            let chosen = cases
                                .iter()
                                .find(|(key, _)| *key == value)
                                .or_else(|| cases.iter().find(|(key, _)| key == "other"));
                            if let Some((_, message)) = chosen {
                                self.render(message, locale, args, pound, out);
                            }
                        }
                    }
                }
            }
        }
    }

    fn render_simple(
        &self,
        keyword: &str,
        style: Option<&str>,
        arg: &MessageArg,
        locale: &Locale,
        args: &NamedArgs,
        out: &mut String,
    ) {
        match (keyword, arg) {
            ("number", _) => match arg.as_number() {
                Some(n) => out.push_str(&format_number(n, style, locale)),
                None => out.push_str(&arg.to_string()),
            },
            ("date", MessageArg::Temporal(t)) => {
                out.push_str(&t.format(&date_pattern(style)).to_string());
            }
            ("time", MessageArg::Temporal(t)) => {
                out.push_str(&t.format(&time_pattern(style)).to_string());
            }
            ("choice", _) => {
                let (Some(n), Some(style)) = (arg.as_number(), style) else {
                    out.push_str(&arg.to_string());
                    return;
                };
                let text = choose(style, n);
                if text.contains('{') {
                    let template = self.compile(&text);
                    self.render(&template, locale, args, None, out);
                } else {
                    out.push_str(&text);
                }
            }
            _ => out.push_str(&arg.to_string()),
        }
    }
}

impl MessageFormatter for IcuFormatter {
    fn format(&self, template: &str, locale: &Locale, args: &NamedArgs) -> String {
        let compiled = self.compile(template);
        let mut out = String::with_capacity(template.len());
        self.render(&compiled, locale, args, None, &mut out);
        out
    }
}

/// Integral values print without a fraction; others use the shortest
/// round-trip form.
fn plain_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Grouping and decimal separators for a locale's language.
fn separators(locale: &Locale) -> (&'static str, char) {
    match locale.language() {
        "de" | "es" | "it" | "nl" | "pt" | "da" | "id" | "tr" => (".", ','),
        "fr" | "ru" | "pl" | "cs" | "sv" | "nb" | "fi" | "uk" => ("\u{a0}", ','),
        _ => (",", '.'),
    }
}

/// Format a number for the `number` keyword.
///
/// Styles: none (up to three fraction digits), `integer`, `percent`, or a
/// decimal pattern such as `#,##0.00` whose zeros after the point fix the
/// number of fraction digits.
fn format_number(n: f64, style: Option<&str>, locale: &Locale) -> String {
    if !n.is_finite() {
        return plain_number(n);
    }
    let (value, fraction_digits, grouping, suffix) = match style.map(str::trim) {
        None | Some("") => (n, None, true, ""),
        Some("integer") => (n, Some(0), true, ""),
        Some("percent") => (n * 100.0, Some(0), true, "%"),
        Some(pattern) => {
            let fraction = pattern
                .split_once('.')
                .map(|(_, frac)| frac.chars().filter(|c| *c == '0').count())
                .unwrap_or(0);
            (n, Some(fraction), pattern.contains(','), "")
        }
    };

    let rendered = match fraction_digits {
        Some(digits) => format!("{value:.digits$}"),
        None => {
            let fixed = format!("{value:.3}");
            let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
            trimmed.to_string()
        }
    };

    let (group, decimal) = separators(locale);
    let (sign, unsigned) = match rendered.strip_prefix('-') {
        Some(rest) if rest.chars().any(|c| c != '0' && c != '.') => ("-", rest),
        Some(rest) => ("", rest),
        None => ("", rendered.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut out = String::from(sign);
    if grouping {
        let len = int_part.len();
        for (i, c) in int_part.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push_str(group);
            }
            out.push(c);
        }
    } else {
        out.push_str(int_part);
    }
    if let Some(frac) = frac_part {
        out.push(decimal);
        out.push_str(frac);
    }
    out.push_str(suffix);
    out
}

/// Cardinal plural category. Exact `=N` cases are matched before this.
fn plural_category(locale: &Locale, n: f64) -> &'static str {
    let integral = n.fract() == 0.0;
    match locale.language() {
        "ja" | "zh" | "ko" | "th" | "vi" | "id" => "other",
        "fr" | "pt" if (0.0..2.0).contains(&n) => "one",
        "fr" | "pt" => "other",
        _ if integral && n == 1.0 => "one",
        _ => "other",
    }
}

/// Ordinal plural category (English rules; other languages use `other`).
fn ordinal_category(locale: &Locale, n: f64) -> &'static str {
    if locale.language() != "en" && !locale.language().is_empty() {
        return "other";
    }
    if n.fract() != 0.0 || n < 0.0 {
        return "other";
    }
    let n = n as u64;
    match (n % 10, n % 100) {
        (1, r) if r != 11 => "one",
        (2, r) if r != 12 => "two",
        (3, r) if r != 13 => "few",
        _ => "other",
    }
}

/// Pick the text of a `choice` style (`0#none|1#one|1<many`).
///
/// `#` (or `≤`) means "at least the limit", `<` means "above the limit".
/// The last satisfied segment wins; below every limit the first one applies.
fn choose(style: &str, n: f64) -> String {
    let mut chosen: Option<&str> = None;
    let mut first: Option<&str> = None;
    for segment in split_choice(style) {
        let Some(at) = segment.find(['#', '<', '≤']) else {
            continue;
        };
        let Ok(limit) = segment[..at].trim().parse::<f64>() else {
            continue;
        };
        let strict = segment[at..].starts_with('<');
        let text = &segment[at + segment[at..].chars().next().map_or(1, char::len_utf8)..];
        first.get_or_insert(text);
        if (strict && n > limit) || (!strict && n >= limit) {
            chosen = Some(text);
        }
    }
    chosen.or(first).unwrap_or_default().to_string()
}

/// Split on `|` outside quotes and nested braces.
fn split_choice(style: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut quoted = false;
    let mut start = 0;
    for (i, c) in style.char_indices() {
        match c {
            '\'' => quoted = !quoted,
            '{' if !quoted => depth += 1,
            '}' if !quoted => depth = depth.saturating_sub(1),
            '|' if !quoted && depth == 0 => {
                segments.push(&style[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&style[start..]);
    segments
}

fn date_pattern(style: Option<&str>) -> String {
    match style.map(str::trim) {
        None | Some("") | Some("medium") => "%b %-d, %Y".into(),
        Some("short") => "%-m/%-d/%y".into(),
        Some("long") => "%B %-d, %Y".into(),
        Some("full") => "%A, %B %-d, %Y".into(),
        Some(pattern) => skeleton_to_chrono(pattern),
    }
}

fn time_pattern(style: Option<&str>) -> String {
    match style.map(str::trim) {
        None | Some("") | Some("medium") | Some("long") | Some("full") => "%-I:%M:%S %p".into(),
        Some("short") => "%-I:%M %p".into(),
        Some(pattern) => skeleton_to_chrono(pattern),
    }
}

/// Translate a date pattern (`yyyy-MM-dd HH:mm`) into a chrono format string.
fn skeleton_to_chrono(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\'' {
            i += 1;
            while i < chars.len() && chars[i] != '\'' {
                push_literal(&mut out, chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }
        let run = chars[i..].iter().take_while(|x| **x == c).count();
        let spec = match (c, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', 1) => "%-m",
            ('M', 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', 1) => "%-d",
            ('d', _) => "%d",
            ('H', 1) => "%-H",
            ('H', _) => "%H",
            ('h', 1) => "%-I",
            ('h', _) => "%I",
            ('m', _) => "%M",
            ('s', _) => "%S",
            ('a', _) => "%p",
            ('E', 4..) => "%A",
            ('E', _) => "%a",
            _ => {
                for _ in 0..run {
                    push_literal(&mut out, c);
                }
                i += run;
                continue;
            }
        };
        out.push_str(spec);
        i += run;
    }
    out
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, MessageArg)]) -> NamedArgs {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn en() -> Locale {
        Locale::parse("en")
    }

    #[test]
    fn substitutes_plain_arguments() {
        let f = IcuFormatter::new();
        let out = f.format("Hello {name}!", &en(), &args(&[("name", "Ada".into())]));
        assert_eq!(out, "Hello Ada!");
    }

    #[test]
    fn leaves_missing_arguments_visible() {
        let f = IcuFormatter::new();
        assert_eq!(f.format("Hi {who}", &en(), &NamedArgs::new()), "Hi {who}");
    }

    #[test]
    fn formats_numbers_per_style_and_locale() {
        let f = IcuFormatter::new();
        let a = args(&[("n", 1234567.891.into())]);
        assert_eq!(f.format("{n, number}", &en(), &a), "1,234,567.891");
        assert_eq!(f.format("{n, number, integer}", &en(), &a), "1,234,568");
        assert_eq!(f.format("{n, number, #,##0.00}", &en(), &a), "1,234,567.89");
        assert_eq!(f.format("{n, number}", &Locale::parse("de"), &a), "1.234.567,891");
        assert_eq!(
            f.format("{p, number, percent}", &en(), &args(&[("p", 0.25.into())])),
            "25%"
        );
    }

    #[test]
    fn selects_plural_cases() {
        let f = IcuFormatter::new();
        let t = "You have {count, plural, =0{no items} one{1 item} other{{count} items}}";
        assert_eq!(f.format(t, &en(), &args(&[("count", 0.into())])), "You have no items");
        assert_eq!(f.format(t, &en(), &args(&[("count", 1.into())])), "You have 1 item");
        assert_eq!(f.format(t, &en(), &args(&[("count", 1500.into())])), "You have 1,500 items");
    }

    #[test]
    fn applies_plural_offset_to_pound() {
        let f = IcuFormatter::new();
        let t = "{n, plural, offset:1 =1{{host} alone} one{{host} and one other} other{{host} and # others}}";
        let a = |n: i32| args(&[("n", n.into()), ("host", "Kim".into())]);
        assert_eq!(f.format(t, &en(), &a(1)), "Kim alone");
        assert_eq!(f.format(t, &en(), &a(2)), "Kim and one other");
        assert_eq!(f.format(t, &en(), &a(5)), "Kim and 4 others");
    }

    #[test]
    fn selects_ordinals_and_keywords() {
        let f = IcuFormatter::new();
        let t = "{n, selectordinal, one{#st} two{#nd} few{#rd} other{#th}}";
        let render = |n: i32| f.format(t, &en(), &args(&[("n", n.into())]));
        assert_eq!(render(1), "1st");
        assert_eq!(render(2), "2nd");
        assert_eq!(render(3), "3rd");
        assert_eq!(render(11), "11th");
        assert_eq!(render(22), "22nd");

        let g = "{g, select, female{She} male{He} other{They}} left";
        assert_eq!(f.format(g, &en(), &args(&[("g", "female".into())])), "She left");
        assert_eq!(f.format(g, &en(), &args(&[("g", "x".into())])), "They left");
    }

    #[test]
    fn resolves_choice_segments() {
        let f = IcuFormatter::new();
        let t = "{n, choice, 0#no files|1#one file|1<{n, number, integer} files}";
        let render = |n: f64| f.format(t, &en(), &args(&[("n", n.into())]));
        assert_eq!(render(0.0), "no files");
        assert_eq!(render(1.0), "one file");
        assert_eq!(render(3.0), "3 files");
        assert_eq!(render(-1.0), "no files");
    }

    #[test]
    fn formats_dates_and_times() {
        let f = IcuFormatter::new();
        let when = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 7, 9)
            .unwrap();
        let a = args(&[("when", when.into())]);
        assert_eq!(f.format("{when, date, short}", &en(), &a), "3/5/24");
        assert_eq!(f.format("{when, date}", &en(), &a), "Mar 5, 2024");
        assert_eq!(f.format("{when, time, short}", &en(), &a), "2:07 PM");
        assert_eq!(f.format("{when, date, yyyy-MM-dd'T'HH:mm}", &en(), &a), "2024-03-05T14:07");
    }

    #[test]
    fn reuses_compiled_templates() {
        let f = IcuFormatter::new();
        let first = f.compile("{a} and {b}");
        let second = f.compile("{a} and {b}");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn malformed_templates_render_literally() {
        let f = IcuFormatter::new();
        assert_eq!(f.format("broken {", &en(), &NamedArgs::new()), "broken {");
    }

    #[test]
    fn option_arguments_become_null() {
        let none: Option<&str> = None;
        assert_eq!(MessageArg::from(none), MessageArg::Null);
        assert_eq!(MessageArg::from(Some(3)), MessageArg::Number(3.0));
    }
}
