//! ISO-10303-21 exchange structure parser.
//!
//! Produces raw records: header entities and data-section instances with
//! positional arguments. Naming the arguments is the caller's job.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while},
    character::complete::{alpha1, alphanumeric1, char, digit0, digit1, multispace0, one_of},
    combinator::{cut, map, opt, recognize, value},
    error::{Error as NomError, ErrorKind},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, preceded, terminated, tuple},
};

use crate::model::{EntityRef, Value};

// ============================================================================
// Raw records
// ============================================================================

/// `NAME(arg, arg, ...)`
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    pub args: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InstanceBody {
    Simple(Record),
    /// `#n=(A(..)B(..));` is one instance spread over several partial records.
    Complex(Vec<Record>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub id: u64,
    pub body: InstanceBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeFile {
    pub header: Vec<Record>,
    pub instances: Vec<Instance>,
}

// ============================================================================
// Comments
// ============================================================================

/// Blank out `/* ... */` comments, keeping newlines so offsets still map to
/// the same lines.
pub fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            if c == '\'' {
                in_string = false;
            }
            out.push(c);
            continue;
        }
        match c {
            '\'' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                out.push_str("  ");
                let mut prev = '\0';
                for c in chars.by_ref() {
                    out.push(if c == '\n' { '\n' } else { ' ' });
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Exchange structure
// ============================================================================

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Parse a complete exchange file (comments must already be stripped).
pub fn parse_exchange(input: &str) -> IResult<&str, ExchangeFile> {
    let (input, _) = ws(tag_no_case("ISO-10303-21;"))(input)?;
    let (input, header) = parse_header_section(input)?;
    let (input, sections) = many1(parse_data_section)(input)?;
    let (input, _) = ws(tag_no_case("END-ISO-10303-21;"))(input)?;

    let instances = sections.into_iter().flatten().collect();
    Ok((input, ExchangeFile { header, instances }))
}

fn parse_header_section(input: &str) -> IResult<&str, Vec<Record>> {
    let (input, _) = ws(tag_no_case("HEADER;"))(input)?;
    let (input, records) = many0(terminated(ws(parse_record), ws(char(';'))))(input)?;
    let (input, _) = ws(tag_no_case("ENDSEC;"))(input)?;
    Ok((input, records))
}

fn parse_data_section(input: &str) -> IResult<&str, Vec<Instance>> {
    let (input, _) = ws(tag_no_case("DATA"))(input)?;
    // DATA may carry a parameter list in later editions of the format.
    let (input, _) = opt(parse_list)(input)?;
    let (input, _) = ws(char(';'))(input)?;
    let (input, instances) = many0(ws(parse_instance))(input)?;
    let (input, _) = ws(tag_no_case("ENDSEC;"))(input)?;
    Ok((input, instances))
}

/// `#id = NAME(args);` or `#id = (A(args) B(args));`
fn parse_instance(input: &str) -> IResult<&str, Instance> {
    let start = input;
    let (input, id) = preceded(char('#'), digit1)(input)?;
    // Same range as `#n` references, so every instance stays addressable.
    let id = id
        .parse::<i64>()
        .ok()
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| nom::Err::Failure(NomError::new(start, ErrorKind::Digit)))?;
    let (input, _) = ws(char('='))(input)?;
    let (input, body) = cut(terminated(
        alt((
            map(parse_record, InstanceBody::Simple),
            map(
                delimited(char('('), many1(ws(parse_record)), char(')')),
                InstanceBody::Complex,
            ),
        )),
        ws(char(';')),
    ))(input)?;
    Ok((input, Instance { id, body }))
}

fn parse_record(input: &str) -> IResult<&str, Record> {
    let (input, name) = parse_keyword(input)?;
    let (input, _) = multispace0(input)?;
    let (input, args) = parse_list(input)?;
    Ok((input, Record { name: name.to_string(), args }))
}

fn parse_keyword(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

// ============================================================================
// Values
// ============================================================================

/// `(v, v, ...)`
fn parse_list(input: &str) -> IResult<&str, Vec<Value>> {
    delimited(
        char('('),
        separated_list0(char(','), ws(parse_value)),
        preceded(multispace0, char(')')),
    )(input)
}

pub fn parse_value(input: &str) -> IResult<&str, Value> {
    alt((
        value(Value::Null, char('$')),
        value(Value::Null, char('*')),
        map(parse_reference, Value::Reference),
        map(parse_string, Value::String),
        parse_enumeration,
        map(parse_binary, Value::Binary),
        map(parse_list, Value::List),
        parse_typed,
        parse_number,
    ))(input)
}

/// `#123`
fn parse_reference(input: &str) -> IResult<&str, EntityRef> {
    let (rest, digits) = preceded(char('#'), digit1)(input)?;
    let id = digits
        .parse()
        .map_err(|_| nom::Err::Error(NomError::new(input, ErrorKind::Digit)))?;
    Ok((rest, EntityRef(id)))
}

/// `'text'` with `''` as an embedded quote.
fn parse_string(input: &str) -> IResult<&str, String> {
    let (mut rest, _) = char('\'')(input)?;
    let mut raw = String::new();
    loop {
        let Some(pos) = rest.find('\'') else {
            return Err(nom::Err::Failure(NomError::new(input, ErrorKind::Char)));
        };
        raw.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        if let Some(next) = after.strip_prefix('\'') {
            raw.push('\'');
            rest = next;
        } else {
            return Ok((after, decode_string(&raw)));
        }
    }
}

/// `.T.` / `.F.` / `.U.` / `.NAME.`
fn parse_enumeration(input: &str) -> IResult<&str, Value> {
    let (rest, name) = delimited(
        char('.'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
        char('.'),
    )(input)?;
    let v = match name {
        "T" => Value::Bool(true),
        "F" => Value::Bool(false),
        "U" => Value::Logical(None),
        other => Value::Enum(other.to_string()),
    };
    Ok((rest, v))
}

/// `"0A1F"`
fn parse_binary(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('"'), take_while(|c: char| c.is_ascii_hexdigit()), char('"')),
        str::to_string,
    )(input)
}

/// `IFCLABEL('x')`
fn parse_typed(input: &str) -> IResult<&str, Value> {
    let (input, name) = parse_keyword(input)?;
    let (input, _) = multispace0(input)?;
    let (input, inner) = delimited(char('('), ws(parse_value), char(')'))(input)?;
    let type_tag = super::schema::canonical_name(name)
        .map(str::to_string)
        .unwrap_or_else(|| canonical_simple_type(name));
    Ok((input, Value::Typed { type_tag, value: Box::new(inner) }))
}

/// Integers, and reals (anything with a `.` or exponent).
fn parse_number(input: &str) -> IResult<&str, Value> {
    let (rest, text) = recognize(tuple((
        opt(one_of("+-")),
        digit1,
        opt(pair(char('.'), digit0)),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)?;

    let v = if text.contains(['.', 'e', 'E']) {
        text.parse::<f64>()
            .map(Value::Real)
            .map_err(|_| nom::Err::Error(NomError::new(input, ErrorKind::Float)))?
    } else {
        text.parse::<i64>()
            .map(Value::Int)
            .map_err(|_| nom::Err::Error(NomError::new(input, ErrorKind::Digit)))?
    };
    Ok((rest, v))
}

// ============================================================================
// String encoding
// ============================================================================

/// Spell defined types the way the schema does: `IFCLENGTHMEASURE` has no
/// table entry, so fall back to `Ifc` + capitalised remainder.
fn canonical_simple_type(name: &str) -> String {
    match name.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("ifc") => {
            let rest = &name[3..];
            let mut out = String::from("Ifc");
            let mut chars = rest.chars();
            if let Some(first) = chars.next() {
                out.push(first.to_ascii_uppercase());
                out.extend(chars.map(|c| c.to_ascii_lowercase()));
            }
            out
        }
        _ => name.to_string(),
    }
}

/// Decode control directives: `\X2\hhhh...\X0\` (UTF-16), `\X\hh`
/// (ISO 8859-1) and `\\`. Anything unrecognised is kept verbatim.
pub fn decode_string(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if let Some(body) = rest.strip_prefix("\\X2\\") {
            if let Some(end) = body.find("\\X0\\") {
                let hex = &body[..end];
                let units: Option<Vec<u16>> = hex
                    .as_bytes()
                    .chunks(4)
                    .map(|c| std::str::from_utf8(c).ok().and_then(|s| u16::from_str_radix(s, 16).ok()))
                    .collect();
                if let Some(units) = units.filter(|_| hex.len() % 4 == 0) {
                    out.extend(char::decode_utf16(units).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)));
                    rest = &body[end + 4..];
                    continue;
                }
            }
        } else if let Some(body) = rest.strip_prefix("\\X\\") {
            if let Some(byte) = body.get(..2).and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(char::from(byte));
                rest = &body[2..];
                continue;
            }
        } else if let Some(body) = rest.strip_prefix("\\\\") {
            out.push('\\');
            rest = body;
            continue;
        }

        out.push('\\');
        rest = &rest[1..];
    }
    out.push_str(rest);
    out
}
