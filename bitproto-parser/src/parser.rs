//! Syntactic grammar (C2): turns the token stream from [`crate::lexer`] into
//! a [`crate::ast::ProtoFile`].

use nom::branch::alt;
use nom::character::complete::char;
use nom::combinator::{map, opt};
use nom::multi::{many0, separated_list0};
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::IResult;

use crate::ast::*;
use crate::lexer::{
    bool_literal, dotted_ident, hex_integer, int_literal, keyword, pos, raw_ident, sized_int_token,
    string_literal, ws0, ws1, Span,
};

fn padded<'a, O, F>(mut inner: F) -> impl FnMut(Span<'a>) -> IResult<Span<'a>, O>
where
    F: FnMut(Span<'a>) -> IResult<Span<'a>, O>,
{
    move |input| {
        let (input, _) = ws0(input)?;
        let (input, out) = inner(input)?;
        let (input, _) = ws0(input)?;
        Ok((input, out))
    }
}

// ---- const expressions -----------------------------------------------

fn const_primary(input: Span) -> IResult<Span, ConstExpr> {
    let p = pos(&input);
    alt((
        map(bool_literal, ConstExpr::Bool),
        map(string_literal, ConstExpr::Str),
        map(int_literal, |i| ConstExpr::Int(i.value)),
        map(raw_ident, ConstExpr::Ident),
        map(
            preceded(pair(char('-'), ws0), const_unary),
            move |e| ConstExpr::Neg(Box::new(e), p),
        ),
        delimited(
            terminated(char('('), ws0),
            const_expr,
            preceded(ws0, char(')')),
        ),
    ))(input)
}

fn const_unary(input: Span) -> IResult<Span, ConstExpr> {
    const_primary(input)
}

fn const_term(input: Span) -> IResult<Span, ConstExpr> {
    let (input, first) = const_unary(input)?;
    let (input, rest) = many0(pair(
        delimited(ws0, alt((char('*'), char('/'))), ws0),
        const_unary,
    ))(input)?;
    Ok((
        input,
        rest.into_iter().fold(first, |acc, (op, rhs)| {
            let p = rhs.pos();
            let op = if op == '*' { BinOp::Mul } else { BinOp::Div };
            ConstExpr::BinOp(op, Box::new(acc), Box::new(rhs), p)
        }),
    ))
}

/// Top-level constant expression: `+ - * /` and parentheses over integers,
/// plus bare boolean/string/identifier literals.
pub fn const_expr(input: Span) -> IResult<Span, ConstExpr> {
    let (input, first) = const_term(input)?;
    let (input, rest) = many0(pair(
        delimited(ws0, alt((char('+'), char('-'))), ws0),
        const_term,
    ))(input)?;
    Ok((
        input,
        rest.into_iter().fold(first, |acc, (op, rhs)| {
            let p = rhs.pos();
            let op = if op == '+' { BinOp::Add } else { BinOp::Sub };
            ConstExpr::BinOp(op, Box::new(acc), Box::new(rhs), p)
        }),
    ))
}

// ---- types --------------------------------------------------------------

fn base_type_kind(input: Span) -> IResult<Span, TypeKind> {
    alt((
        map(keyword("bool"), |_| TypeKind::Bool),
        map(keyword("byte"), |_| TypeKind::Byte),
        map(sized_int_token("uint"), TypeKind::Uint),
        map(sized_int_token("int"), TypeKind::Int),
        map(dotted_ident, TypeKind::Named),
    ))(input)
}

/// Parses a type, including any number of trailing `[cap]` array
/// dimensions, each with its own optional extensibility marker.
pub fn type_expr(input: Span) -> IResult<Span, TypeExpr> {
    let p = pos(&input);
    let (input, kind) = base_type_kind(input)?;
    let mut ty = TypeExpr {
        kind,
        extensible: false,
        pos: p,
    };
    let mut rest = input;
    loop {
        let attempt: IResult<Span, (ConstExpr, bool)> = pair(
            delimited(char('['), padded(const_expr), char(']')),
            map(opt(char('\'')), |q| q.is_some()),
        )(rest);
        match attempt {
            Ok((next_rest, (cap, extensible))) => {
                ty = TypeExpr {
                    kind: TypeKind::Array {
                        element: Box::new(ty),
                        cap,
                    },
                    extensible,
                    pos: p,
                };
                rest = next_rest;
            }
            Err(_) => break,
        }
    }
    Ok((rest, ty))
}

// ---- declarations ---------------------------------------------------------

fn const_decl(input: Span) -> IResult<Span, ConstDecl> {
    map(
        tuple((
            keyword("const"),
            preceded(ws1, raw_ident),
            delimited(ws0, char('='), ws0),
            const_expr,
            preceded(ws0, opt(char(';'))),
        )),
        |(_, name, _, expr, _)| ConstDecl { name, expr },
    )(input)
}

fn alias_decl(input: Span) -> IResult<Span, AliasDecl> {
    map(
        tuple((
            keyword("type"),
            preceded(ws1, raw_ident),
            delimited(ws0, char('='), ws0),
            type_expr,
            preceded(ws0, opt(char(';'))),
        )),
        |(_, name, _, target, _)| AliasDecl { name, target },
    )(input)
}

fn enum_value_decl(input: Span) -> IResult<Span, EnumValueDecl> {
    map(
        tuple((
            raw_ident,
            delimited(ws0, char('='), ws0),
            alt((hex_integer, int_literal)),
            preceded(ws0, opt(char(';'))),
        )),
        |(name, _, value, _)| EnumValueDecl { name, value },
    )(input)
}

fn enum_decl(input: Span) -> IResult<Span, EnumDecl> {
    map(
        tuple((
            keyword("enum"),
            preceded(ws1, raw_ident),
            delimited(ws0, char(':'), ws0),
            type_expr,
            delimited(ws0, char('{'), ws0),
            separated_list0(ws0, enum_value_decl),
            preceded(ws0, char('}')),
        )),
        |(_, name, _, backing, _, values, _)| EnumDecl {
            name,
            backing,
            values,
        },
    )(input)
}

fn literal(input: Span) -> IResult<Span, Literal> {
    alt((
        map(bool_literal, Literal::Bool),
        map(string_literal, Literal::Str),
        map(int_literal, |i| Literal::Int(i.value)),
        map(raw_ident, Literal::Ident),
    ))(input)
}

fn option_decl(input: Span) -> IResult<Span, OptionDecl> {
    let p0 = pos(&input);
    map(
        tuple((
            keyword("option"),
            preceded(ws1, dotted_ident),
            delimited(ws0, char('='), ws0),
            literal,
            preceded(ws0, opt(char(';'))),
        )),
        move |(_, name, _, value, _)| OptionDecl {
            name,
            value,
            pos: p0,
        },
    )(input)
}

fn field_decl(input: Span) -> IResult<Span, FieldDecl> {
    map(
        tuple((
            type_expr,
            preceded(ws1, raw_ident),
            delimited(ws0, char('='), ws0),
            alt((hex_integer, int_literal)),
            preceded(ws0, opt(char(';'))),
        )),
        |(ty, name, _, number, _)| FieldDecl { ty, name, number },
    )(input)
}

fn message_item(input: Span) -> IResult<Span, MessageItem> {
    alt((
        map(enum_decl, MessageItem::Enum),
        map(message_decl, MessageItem::Message),
        map(alias_decl, MessageItem::Alias),
        map(const_decl, MessageItem::Const),
        map(option_decl, MessageItem::Option),
        map(field_decl, MessageItem::Field),
    ))(input)
}

pub fn message_decl(input: Span) -> IResult<Span, MessageDecl> {
    map(
        tuple((
            keyword("message"),
            preceded(ws1, raw_ident),
            map(opt(preceded(ws0, char('\''))), |q| q.is_some()),
            delimited(ws0, char('{'), ws0),
            separated_list0(ws0, message_item),
            preceded(ws0, char('}')),
        )),
        |(_, name, extensible, _, items, _)| MessageDecl {
            name,
            extensible,
            items,
        },
    )(input)
}

fn import_decl(input: Span) -> IResult<Span, ImportDecl> {
    let p0 = pos(&input);
    map(
        tuple((
            keyword("import"),
            ws1,
            opt(terminated(raw_ident, ws1)),
            string_literal,
            preceded(ws0, opt(char(';'))),
        )),
        move |(_, _, alias, path, _)| ImportDecl {
            alias,
            path,
            pos: p0,
        },
    )(input)
}

fn item(input: Span) -> IResult<Span, Item> {
    alt((
        map(import_decl, Item::Import),
        map(enum_decl, Item::Enum),
        map(message_decl, Item::Message),
        map(alias_decl, Item::Alias),
        map(const_decl, Item::Const),
        map(option_decl, Item::Option),
    ))(input)
}

fn proto_header(input: Span) -> IResult<Span, Ident> {
    preceded(pair(keyword("proto"), ws1), raw_ident)(input)
}

/// Parses a complete `.bitproto` source file.
pub fn parse(input: Span) -> IResult<Span, ProtoFile> {
    map(
        tuple((
            padded(proto_header),
            preceded(opt(char(';')), ws0),
            separated_list0(ws0, item),
            ws0,
        )),
        |(name, _, items, _)| ProtoFile { name, items },
    )(input)
}

#[cfg(test)]
mod test {
    use super::*;
    use nom_locate::LocatedSpan;

    fn run<'a, T>(
        mut f: impl FnMut(Span<'a>) -> IResult<Span<'a>, T>,
        src: &'a str,
    ) -> (String, T) {
        let (rest, out) = f(LocatedSpan::new(src)).expect("parse failed");
        (rest.fragment().to_string(), out)
    }

    #[test]
    fn parses_minimal_proto_header() {
        let (rest, file) = run(parse, "proto demo\n");
        assert_eq!(file.name.as_str(), "demo");
        assert!(file.items.is_empty());
        assert!(rest.trim().is_empty());
    }

    #[test]
    fn parses_message_with_fields() {
        let src = r#"
proto demo

message Point {
    int16 x = 1
    int16 y = 2
}
"#;
        let (_, file) = run(parse, src);
        assert_eq!(file.items.len(), 1);
        match &file.items[0] {
            Item::Message(m) => {
                assert_eq!(m.name.as_str(), "Point");
                assert!(!m.extensible);
                assert_eq!(m.items.len(), 2);
            }
            other => panic!("expected message, got {:?}", other),
        }
    }

    #[test]
    fn parses_extensible_message_and_array_field() {
        let src = r#"
proto demo

message Outer' {
    uint8[4]' data = 1
}
"#;
        let (_, file) = run(parse, src);
        match &file.items[0] {
            Item::Message(m) => {
                assert!(m.extensible);
                match &m.items[0] {
                    MessageItem::Field(f) => {
                        assert!(f.ty.extensible);
                        match &f.ty.kind {
                            TypeKind::Array { cap, .. } => {
                                assert_eq!(*cap, ConstExpr::Int(4));
                            }
                            other => panic!("expected array, got {:?}", other),
                        }
                    }
                    other => panic!("expected field, got {:?}", other),
                }
            }
            other => panic!("expected message, got {:?}", other),
        }
    }

    #[test]
    fn parses_enum_and_const() {
        let src = r#"
proto demo

const MAX = 4 * (2 + 1)

enum Color : uint3 {
    RED = 0
    GREEN = 1
    BLUE = 2
}
"#;
        let (_, file) = run(parse, src);
        assert_eq!(file.items.len(), 2);
        assert!(matches!(file.items[0], Item::Const(_)));
        match &file.items[1] {
            Item::Enum(e) => assert_eq!(e.values.len(), 3),
            other => panic!("expected enum, got {:?}", other),
        }
    }

    #[test]
    fn parses_import_with_alias() {
        let (_, file) = run(parse, "proto demo\nimport foo \"foo.bitproto\"\n");
        match &file.items[0] {
            Item::Import(i) => {
                assert_eq!(i.alias.unwrap().as_str(), "foo");
                assert_eq!(i.path, "foo.bitproto");
            }
            other => panic!("expected import, got {:?}", other),
        }
    }
}
