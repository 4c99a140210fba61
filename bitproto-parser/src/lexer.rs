//! Lexical grammar (C1): whitespace/comment skipping, identifiers, integer
//! and string literals, and the base-type tokens. Everything here is a
//! `nom` combinator operating on a [`Span`]; the parser module composes
//! these into the syntactic grammar.

use nom::branch::alt;
use nom::bytes::complete::{escaped_transform, tag, take_till, take_while, take_while1};
use nom::character::complete::{char, digit1, hex_digit1, multispace1, none_of};
use nom::combinator::{map, map_res, opt, recognize, value};
use nom::multi::many0;
use nom::sequence::{pair, preceded};
use nom::IResult;
use nom_locate::LocatedSpan;

use crate::ast::{Ident, IntLit, Pos};

pub type Span<'a> = LocatedSpan<&'a str>;

pub fn pos(span: &Span<'_>) -> Pos {
    Pos {
        line: span.location_line(),
        column: span.get_utf8_column(),
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A single `[A-Za-z_][A-Za-z0-9_]*` identifier (not dotted).
pub fn raw_ident(input: Span) -> IResult<Span, Ident> {
    let p = pos(&input);
    map(
        recognize(pair(
            nom::character::complete::satisfy(is_ident_start),
            take_while(is_ident_continue),
        )),
        move |span: Span| Ident {
            name: span.fragment(),
            pos: p,
        },
    )(input)
}

/// A dotted identifier path, e.g. `pkg.Outer.Inner`.
pub fn dotted_ident(input: Span) -> IResult<Span, Vec<Ident>> {
    nom::multi::separated_list1(char('.'), raw_ident)(input)
}

fn line_comment(input: Span) -> IResult<Span, ()> {
    value((), pair(tag("//"), take_till(|c| c == '\n')))(input)
}

fn block_comment(input: Span) -> IResult<Span, ()> {
    value(
        (),
        pair(
            tag("/*"),
            pair(nom::bytes::complete::take_until("*/"), tag("*/")),
        ),
    )(input)
}

/// Any amount of whitespace and/or comments (possibly none).
pub fn ws0(input: Span) -> IResult<Span, ()> {
    value(
        (),
        many0(alt((value((), multispace1), line_comment, block_comment))),
    )(input)
}

/// At least one unit of whitespace or comment (a "word break").
pub fn ws1(input: Span) -> IResult<Span, ()> {
    value(
        (),
        nom::multi::many1(alt((value((), multispace1), line_comment, block_comment))),
    )(input)
}

/// Matches a fixed keyword, rejecting it if followed by further identifier
/// characters (so `importx` is not parsed as `import` + `x`).
pub fn keyword<'a>(kw: &'static str) -> impl FnMut(Span<'a>) -> IResult<Span<'a>, Span<'a>> {
    move |input: Span<'a>| {
        let (rest, matched) = tag(kw)(input)?;
        if let Some(c) = rest.fragment().chars().next() {
            if is_ident_continue(c) {
                return Err(nom::Err::Error(nom::error::Error::new(
                    input,
                    nom::error::ErrorKind::Tag,
                )));
            }
        }
        Ok((rest, matched))
    }
}

pub fn hex_integer(input: Span) -> IResult<Span, IntLit> {
    let p = pos(&input);
    map_res(
        preceded(tag("0x"), recognize(hex_digit1)),
        move |span: Span| -> Result<IntLit, std::num::ParseIntError> {
            let value = i64::from_str_radix(span.fragment(), 16)?;
            Ok(IntLit { value, pos: p })
        },
    )(input)
}

pub fn dec_integer(input: Span) -> IResult<Span, IntLit> {
    let p = pos(&input);
    map_res(
        recognize(digit1),
        move |span: Span| -> Result<IntLit, std::num::ParseIntError> {
            let value = span.fragment().parse::<i64>()?;
            Ok(IntLit { value, pos: p })
        },
    )(input)
}

pub fn int_literal(input: Span) -> IResult<Span, IntLit> {
    alt((hex_integer, dec_integer))(input)
}

/// A double-quoted string literal with `\n \t \\ \"` escapes.
pub fn string_literal(input: Span) -> IResult<Span, String> {
    let (rest, _) = char('"')(input)?;
    let (rest, content) = opt(escaped_transform(
        none_of("\\\""),
        '\\',
        alt((
            value("\\", tag("\\")),
            value("\"", tag("\"")),
            value("\n", tag("n")),
            value("\t", tag("t")),
            value("\r", tag("r")),
        )),
    ))(rest)?;
    let (rest, _) = char('"')(rest)?;
    Ok((rest, content.unwrap_or_default()))
}

/// `true`/`yes` and `false`/`no`, the spec's boolean literal aliases.
pub fn bool_literal(input: Span) -> IResult<Span, bool> {
    alt((
        value(true, keyword("true")),
        value(true, keyword("yes")),
        value(false, keyword("false")),
        value(false, keyword("no")),
    ))(input)
}

/// `uint<N>` / `int<N>` base-type tokens, `1 <= N <= 64`.
pub fn sized_int_token<'a>(
    prefix: &'static str,
) -> impl FnMut(Span<'a>) -> IResult<Span<'a>, u8> {
    move |input: Span<'a>| {
        map_res(
            preceded(tag(prefix), recognize(take_while1(|c: char| c.is_ascii_digit()))),
            |span: Span| -> Result<u8, &'static str> {
                let n: u32 = span.fragment().parse().map_err(|_| "bad width")?;
                if (1..=64).contains(&n) {
                    Ok(n as u8)
                } else {
                    Err("width out of range")
                }
            },
        )(input)
    }
}
