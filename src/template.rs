//! Output templates with `{name:spec}` replacement fields.
//!
//! A template such as `{short_time} |{index:02}| {indent}{content}` is
//! parsed once into literal and field segments, then rendered against a
//! [`Context`] for every line. Supported field specs are
//! `[[fill]align][0][width][.precision][type]` with `align` one of `<`, `>`,
//! `^`, `=` and `type` one of `s`, `d`. Strings align left by default and
//! integers right.

use std::collections::HashMap;

use crate::error::InterleaveError;

/// A value substituted into a template field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Int(i64),
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

/// Named values available to a template while rendering one line.
#[derive(Debug, Default, Clone)]
pub struct Context {
    fields: HashMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
    /// Padding goes between the sign and the digits.
    AfterSign,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FormatSpec {
    /// Explicit fill character; `None` pads with spaces, or zeros under `0`.
    fill: Option<char>,
    align: Option<Align>,
    zero: bool,
    width: usize,
    precision: Option<usize>,
}

impl Default for FormatSpec {
    fn default() -> Self {
        Self {
            fill: None,
            align: None,
            zero: false,
            width: 0,
            precision: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field { name: String, spec: FormatSpec },
}

/// A parsed output template.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template string.
    pub fn parse(source: &str) -> Result<Self, InterleaveError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => {
                    return Err(template_error(source, "single '}' encountered"));
                }
                '{' => {
                    let mut field = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') => {
                                return Err(template_error(source, "nested fields are not supported"));
                            }
                            Some(ch) => field.push(ch),
                            None => return Err(template_error(source, "unterminated field")),
                        }
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(parse_field(source, &field)?);
                }
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The template text as given.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Names of every field the template refers to, in order of appearance.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|seg| match seg {
            Segment::Field { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Render into `out`. Fields missing from `ctx` render as empty strings.
    pub fn render(&self, ctx: &Context, out: &mut String) {
        for seg in &self.segments {
            match seg {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field { name, spec } => match ctx.get(name) {
                    Some(value) => write_value(value, spec, out),
                    None => write_value(&Value::Str(String::new()), spec, out),
                },
            }
        }
    }

    /// Render to a new string.
    pub fn render_to_string(&self, ctx: &Context) -> String {
        let mut out = String::new();
        self.render(ctx, &mut out);
        out
    }
}

fn template_error(source: &str, reason: &str) -> InterleaveError {
    InterleaveError::Template(format!("{reason} in '{source}'"))
}

fn parse_field(source: &str, field: &str) -> Result<Segment, InterleaveError> {
    let (name, spec) = match field.split_once(':') {
        Some((name, spec)) => (name, parse_spec(source, spec)?),
        None => (field, FormatSpec::default()),
    };
    if name.contains('!') {
        return Err(template_error(source, "conversions ('!r', '!s') are not supported"));
    }
    if name.is_empty() || name.chars().all(|c| c.is_ascii_digit()) {
        return Err(template_error(source, "fields must be named"));
    }
    Ok(Segment::Field {
        name: name.to_string(),
        spec,
    })
}

fn parse_spec(source: &str, spec: &str) -> Result<FormatSpec, InterleaveError> {
    let mut parsed = FormatSpec::default();
    let chars: Vec<char> = spec.chars().collect();
    let mut i = 0;

    let align_of = |c: char| match c {
        '<' => Some(Align::Left),
        '>' => Some(Align::Right),
        '^' => Some(Align::Center),
        '=' => Some(Align::AfterSign),
        _ => None,
    };

    if let (Some(&fill), Some(align)) = (chars.first(), chars.get(1).and_then(|&c| align_of(c))) {
        parsed.fill = Some(fill);
        parsed.align = Some(align);
        i = 2;
    } else if let Some(align) = chars.first().and_then(|&c| align_of(c)) {
        parsed.align = Some(align);
        i = 1;
    }

    if chars.get(i) == Some(&'0') {
        parsed.zero = true;
        i += 1;
    }

    let width_start = i;
    while chars.get(i).is_some_and(char::is_ascii_digit) {
        i += 1;
    }
    if i > width_start {
        let digits: String = chars[width_start..i].iter().collect();
        parsed.width = digits
            .parse()
            .map_err(|_| template_error(source, "field width too large"))?;
    }

    if chars.get(i) == Some(&'.') {
        i += 1;
        let precision_start = i;
        while chars.get(i).is_some_and(char::is_ascii_digit) {
            i += 1;
        }
        if i == precision_start {
            return Err(template_error(source, "missing precision after '.'"));
        }
        let digits: String = chars[precision_start..i].iter().collect();
        parsed.precision = Some(
            digits
                .parse()
                .map_err(|_| template_error(source, "precision too large"))?,
        );
    }

    if matches!(chars.get(i), Some('s' | 'd')) {
        i += 1;
    }

    if i != chars.len() {
        return Err(template_error(source, &format!("invalid format spec '{spec}'")));
    }
    Ok(parsed)
}

fn write_value(value: &Value, spec: &FormatSpec, out: &mut String) {
    let (text, numeric) = match value {
        Value::Str(s) => match spec.precision {
            Some(p) => (s.chars().take(p).collect::<String>(), false),
            None => (s.clone(), false),
        },
        Value::Int(n) => (n.to_string(), true),
    };

    let fill = spec.fill.unwrap_or(if spec.zero { '0' } else { ' ' });
    let default_align = match (numeric, spec.zero) {
        (true, true) => Align::AfterSign,
        (true, false) => Align::Right,
        (false, _) => Align::Left,
    };
    let align = spec.align.unwrap_or(default_align);

    let len = text.chars().count();
    let pad = spec.width.saturating_sub(len);
    if pad == 0 {
        out.push_str(&text);
        return;
    }
    let padding = |n: usize, out: &mut String| out.extend(std::iter::repeat_n(fill, n));

    match align {
        Align::Left => {
            out.push_str(&text);
            padding(pad, out);
        }
        Align::Right => {
            padding(pad, out);
            out.push_str(&text);
        }
        Align::Center => {
            let left = pad / 2;
            padding(left, out);
            out.push_str(&text);
            padding(pad - left, out);
        }
        Align::AfterSign => {
            let digits = match text.strip_prefix(['-', '+']) {
                Some(rest) => {
                    out.push_str(&text[..text.len() - rest.len()]);
                    rest
                }
                None => text.as_str(),
            };
            padding(pad, out);
            out.push_str(digits);
        }
    }
}
