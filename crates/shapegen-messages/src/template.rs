//! Message template syntax.
//!
//! Parses the ICU MessageFormat subset used by message bundles:
//!
//! ```text
//! Hello {name}!
//! {count, number, integer} files
//! You have {count, plural, offset:1 =0{none} one{# item} other{# items}}
//! {gender, select, female{She} male{He} other{They}} replied
//! ```
//!
//! Apostrophes quote: `''` is a literal apostrophe and `'{'` is a literal
//! brace. A lone apostrophe before anything else is kept as-is.

/// A parsed message template.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Template {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    /// `#` inside a plural case: the (offset-adjusted) plural number.
    Pound,
    Placeholder(Placeholder),
}

/// One `{name, keyword, style}` occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub name: String,
    pub format: Format,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Format {
    /// `{name}`
    None,
    /// `{name, keyword}` or `{name, keyword, style}` with an opaque style.
    Simple {
        keyword: String,
        style: Option<String>,
    },
    /// `plural` or `selectordinal`.
    Plural {
        ordinal: bool,
        offset: f64,
        cases: Vec<PluralCase>,
    },
    Select {
        cases: Vec<(String, Template)>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PluralCase {
    pub selector: PluralSelector,
    pub message: Template,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PluralSelector {
    /// `=3`
    Exact(f64),
    /// `zero`, `one`, `two`, `few`, `many`, `other`
    Keyword(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("unmatched '}}' at offset {offset}")]
    UnmatchedClose { offset: usize },

    #[error("unclosed '{{' starting at offset {offset}")]
    Unclosed { offset: usize },

    #[error("empty argument name at offset {offset}")]
    EmptyName { offset: usize },

    #[error("expected {expected} at offset {offset}")]
    Expected {
        expected: &'static str,
        offset: usize,
    },

    #[error("invalid number at offset {offset}")]
    InvalidNumber { offset: usize },

    #[error("argument at offset {offset} has no 'other' case")]
    MissingOther { offset: usize },
}

impl Placeholder {
    /// The formatting keyword (`number`, `plural`, ...), if any.
    pub fn keyword(&self) -> Option<&str> {
        match &self.format {
            Format::None => None,
            Format::Simple { keyword, .. } => Some(keyword),
            Format::Plural { ordinal: false, .. } => Some("plural"),
            Format::Plural { ordinal: true, .. } => Some("selectordinal"),
            Format::Select { .. } => Some("select"),
        }
    }
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        Parser { src: source, pos: 0 }.message(Context::Top)
    }

    /// Every placeholder in order of appearance, descending into plural and
    /// select cases right after the placeholder that owns them.
    pub fn placeholders(&self) -> Vec<&Placeholder> {
        let mut out = Vec::new();
        self.collect(&mut out);
        out
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a Placeholder>) {
        for part in &self.parts {
            let Part::Placeholder(placeholder) = part else {
                continue;
            };
            out.push(placeholder);
            match &placeholder.format {
                Format::Plural { cases, .. } => {
                    for case in cases {
                        case.message.collect(out);
                    }
                }
                Format::Select { cases } => {
                    for (_, message) in cases {
                        message.collect(out);
                    }
                }
                Format::None | Format::Simple { .. } => {}
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Top,
    Plural,
    Nested,
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn token(&mut self) -> &str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, ',' | '{' | '}') {
                break;
            }
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn expect(&mut self, want: char, expected: &'static str, open: usize) -> Result<(), TemplateError> {
        match self.bump() {
            Some(c) if c == want => Ok(()),
            None => Err(TemplateError::Unclosed { offset: open }),
            Some(_) => Err(TemplateError::Expected {
                expected,
                offset: self.pos - 1,
            }),
        }
    }

    /// Parse message text up to the end of input (top level) or up to, but
    /// not including, the `}` closing a case body.
    fn message(&mut self, ctx: Context) -> Result<Template, TemplateError> {
        let mut parts = Vec::new();
        let mut text = String::new();

        loop {
            match self.peek() {
                None => break,
                Some('}') if ctx == Context::Top => {
                    return Err(TemplateError::UnmatchedClose { offset: self.pos });
                }
                Some('}') => break,
                Some('{') => {
                    if !text.is_empty() {
                        parts.push(Part::Text(std::mem::take(&mut text)));
                    }
                    let open = self.pos;
                    self.bump();
                    parts.push(Part::Placeholder(self.placeholder(open)?));
                }
                Some('#') if ctx == Context::Plural => {
                    if !text.is_empty() {
                        parts.push(Part::Text(std::mem::take(&mut text)));
                    }
                    self.bump();
                    parts.push(Part::Pound);
                }
                Some('\'') => {
                    self.bump();
                    self.quoted(ctx, &mut text);
                }
                Some(c) => {
                    self.bump();
                    text.push(c);
                }
            }
        }

        if !text.is_empty() {
            parts.push(Part::Text(text));
        }
        Ok(Template { parts })
    }

    /// Handle the text after an apostrophe.
    fn quoted(&mut self, ctx: Context, text: &mut String) {
        match self.peek() {
            Some('\'') => {
                self.bump();
                text.push('\'');
            }
            Some(c) if c == '{' || c == '}' || (c == '#' && ctx == Context::Plural) => {
                while let Some(c) = self.bump() {
                    if c != '\'' {
                        text.push(c);
                    } else if self.peek() == Some('\'') {
                        self.bump();
                        text.push('\'');
                    } else {
                        break;
                    }
                }
            }
            _ => text.push('\''),
        }
    }

    fn placeholder(&mut self, open: usize) -> Result<Placeholder, TemplateError> {
        self.skip_ws();
        let name_at = self.pos;
        let name = self.token().to_string();
        if name.is_empty() {
            return match self.peek() {
                None => Err(TemplateError::Unclosed { offset: open }),
                _ => Err(TemplateError::EmptyName { offset: name_at }),
            };
        }

        self.skip_ws();
        match self.bump() {
            Some('}') => {
                return Ok(Placeholder {
                    name,
                    format: Format::None,
                });
            }
            Some(',') => {}
            None => return Err(TemplateError::Unclosed { offset: open }),
            Some(_) => {
                return Err(TemplateError::Expected {
                    expected: "',' or '}'",
                    offset: self.pos - 1,
                });
            }
        }

        self.skip_ws();
        let keyword_at = self.pos;
        let keyword = self.token().to_string();
        if keyword.is_empty() {
            return Err(TemplateError::Expected {
                expected: "a format type",
                offset: keyword_at,
            });
        }
        self.skip_ws();

        let needs_cases = matches!(keyword.as_str(), "plural" | "selectordinal" | "select");
        match self.bump() {
            Some('}') if !needs_cases => {
                return Ok(Placeholder {
                    name,
                    format: Format::Simple {
                        keyword,
                        style: None,
                    },
                });
            }
            Some(',') => {}
            None => return Err(TemplateError::Unclosed { offset: open }),
            Some(_) => {
                return Err(TemplateError::Expected {
                    expected: if needs_cases { "','" } else { "',' or '}'" },
                    offset: self.pos - 1,
                });
            }
        }

        let format = match keyword.as_str() {
            "plural" => self.plural(false, open)?,
            "selectordinal" => self.plural(true, open)?,
            "select" => self.select(open)?,
            _ => {
                let style = self.raw_style(open)?;
                Format::Simple {
                    keyword,
                    style: (!style.is_empty()).then_some(style),
                }
            }
        };
        self.skip_ws();
        self.expect('}', "'}'", open)?;
        Ok(Placeholder { name, format })
    }

    fn plural(&mut self, ordinal: bool, open: usize) -> Result<Format, TemplateError> {
        self.skip_ws();
        let mut offset = 0.0;
        if self.src[self.pos..].starts_with("offset:") {
            self.pos += "offset:".len();
            self.skip_ws();
            offset = self.number()?;
        }

        let mut cases = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some('}') => break,
                None => return Err(TemplateError::Unclosed { offset: open }),
                Some(_) => {}
            }
            let selector_at = self.pos;
            let selector = match self.token() {
                "" => {
                    return Err(TemplateError::Expected {
                        expected: "a plural selector",
                        offset: selector_at,
                    });
                }
                token => match token.strip_prefix('=') {
                    Some(exact) => PluralSelector::Exact(
                        exact
                            .parse()
                            .map_err(|_| TemplateError::InvalidNumber { offset: selector_at })?,
                    ),
                    None => PluralSelector::Keyword(token.to_string()),
                },
            };
            let message = self.case_body(Context::Plural, open)?;
            cases.push(PluralCase { selector, message });
        }

        let has_other = cases
            .iter()
            .any(|c| matches!(&c.selector, PluralSelector::Keyword(k) if k == "other"));
        if !has_other {
            return Err(TemplateError::MissingOther { offset: open });
        }
        Ok(Format::Plural {
            ordinal,
            offset,
            cases,
        })
    }

    fn select(&mut self, open: usize) -> Result<Format, TemplateError> {
        let mut cases = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some('}') => break,
                None => return Err(TemplateError::Unclosed { offset: open }),
                Some(_) => {}
            }
            let key_at = self.pos;
            let key = self.token().to_string();
            if key.is_empty() {
                return Err(TemplateError::Expected {
                    expected: "a select keyword",
                    offset: key_at,
                });
            }
            let message = self.case_body(Context::Nested, open)?;
            cases.push((key, message));
        }

        if !cases.iter().any(|(key, _)| key == "other") {
            return Err(TemplateError::MissingOther { offset: open });
        }
        Ok(Format::Select { cases })
    }

    fn case_body(&mut self, ctx: Context, open: usize) -> Result<Template, TemplateError> {
        self.skip_ws();
        self.expect('{', "'{' opening a case", open)?;
        let message = self.message(ctx)?;
        self.expect('}', "'}' closing a case", open)?;
        Ok(message)
    }

    /// Raw style text up to the `}` that closes the placeholder, with nested
    /// braces balanced and quoted sections left intact.
    fn raw_style(&mut self, open: usize) -> Result<String, TemplateError> {
        let start = self.pos;
        let mut depth = 0usize;
        let mut quoted = false;
        loop {
            match self.peek() {
                None => return Err(TemplateError::Unclosed { offset: open }),
                Some('\'') => quoted = !quoted,
                Some('{') if !quoted => depth += 1,
                Some('}') if !quoted => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                Some(_) => {}
            }
            self.bump();
        }
        Ok(self.src[start..self.pos].trim().to_string())
    }

    fn number(&mut self) -> Result<f64, TemplateError> {
        let at = self.pos;
        self.token()
            .parse()
            .map_err(|_| TemplateError::InvalidNumber { offset: at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(template: &Template) -> Vec<(&str, Option<&str>)> {
        template
            .placeholders()
            .into_iter()
            .map(|p| (p.name.as_str(), p.keyword()))
            .collect()
    }

    #[test]
    fn parses_simple_placeholders() {
        let t = Template::parse("Hello {name}, you are {age, number, integer}").unwrap();
        assert_eq!(t.parts.len(), 4);
        assert_eq!(names(&t), vec![("name", None), ("age", Some("number"))]);
        let Part::Placeholder(age) = &t.parts[3] else {
            panic!("expected placeholder");
        };
        assert_eq!(
            age.format,
            Format::Simple {
                keyword: "number".into(),
                style: Some("integer".into())
            }
        );
    }

    #[test]
    fn parses_nested_plural_cases() {
        let t = Template::parse("You have {count, plural, one{1 item} other{{count} items}}")
            .unwrap();
        assert_eq!(names(&t), vec![("count", Some("plural")), ("count", None)]);
    }

    #[test]
    fn parses_offset_and_exact_selectors() {
        let t = Template::parse("{n, plural, offset:1 =0{nobody} =1{just {who}} other{{who} and # others}}")
            .unwrap();
        let Part::Placeholder(p) = &t.parts[0] else {
            panic!("expected placeholder");
        };
        let Format::Plural { offset, cases, .. } = &p.format else {
            panic!("expected plural");
        };
        assert_eq!(*offset, 1.0);
        assert_eq!(cases[0].selector, PluralSelector::Exact(0.0));
        assert!(cases[2].message.parts.contains(&Part::Pound));
    }

    #[test]
    fn pound_is_text_outside_plural() {
        let t = Template::parse("Issue #{id}").unwrap();
        assert_eq!(t.parts[0], Part::Text("Issue #".into()));
    }

    #[test]
    fn apostrophes_quote_braces() {
        let t = Template::parse("It''s '{literal}' and don't").unwrap();
        assert_eq!(
            t.parts,
            vec![Part::Text("It's {literal} and don't".into())]
        );
    }

    #[test]
    fn keeps_choice_style_raw() {
        let t = Template::parse("{n, choice, 0#no files|1#one file|1<{n} files}").unwrap();
        let Part::Placeholder(p) = &t.parts[0] else {
            panic!("expected placeholder");
        };
        assert_eq!(
            p.format,
            Format::Simple {
                keyword: "choice".into(),
                style: Some("0#no files|1#one file|1<{n} files".into())
            }
        );
    }

    #[test]
    fn reports_structural_errors() {
        assert_eq!(
            Template::parse("oops }"),
            Err(TemplateError::UnmatchedClose { offset: 5 })
        );
        assert_eq!(
            Template::parse("Hi {name"),
            Err(TemplateError::Unclosed { offset: 3 })
        );
        assert_eq!(
            Template::parse("{}"),
            Err(TemplateError::EmptyName { offset: 1 })
        );
        assert_eq!(
            Template::parse("{n, plural, one{x}}"),
            Err(TemplateError::MissingOther { offset: 0 })
        );
    }
}
