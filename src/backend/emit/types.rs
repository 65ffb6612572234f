//! Token helpers for types, names and constant values.
//!
//! Names go through [`target_ident`], which rejects anything that is not a plain identifier instead of panicking.
//! String and character constants are spelled with escapes the target language reads the same way: hidden
//! characters become four-digit `\xHHHH` escapes in strings and `(char) 0xHHHH` casts as characters.

use proc_macro2::{Ident, Literal, TokenStream, TokenTree};
use quote::quote;

use super::EmitError;
use crate::frontend::annotations::{AttrValue, AttributeArg};
use crate::frontend::ast::Span;
use crate::frontend::diagnostics::errors;
use crate::frontend::types::ResolvedType;

/// One target identifier.
///
/// ## Errors
/// - [`EmitError::InvalidName`] when `name` is not a plain identifier (`$scope`, `1st`, `a-b`, `r#type`).
pub fn target_ident(name: &str, span: Span) -> Result<Ident, EmitError> {
    let invalid = || EmitError::InvalidName(errors::invalid_target_name(name, span));
    if name.starts_with("r#") {
        return Err(invalid());
    }
    let tokens: TokenStream = name.parse().map_err(|_| invalid())?;
    let mut trees = tokens.into_iter();
    match (trees.next(), trees.next()) {
        (Some(TokenTree::Ident(ident)), None) if ident == name => Ok(ident),
        _ => Err(invalid()),
    }
}

/// Emit a possibly dotted name (`System.Serializable`) as a path.
pub fn path_tokens(name: &str, span: Span) -> Result<TokenStream, EmitError> {
    let segments = name
        .split('.')
        .map(|s| target_ident(s, span))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(quote! { #(#segments).* })
}

/// Emit a resolved type.
pub fn resolved_type_tokens(ty: &ResolvedType, span: Span) -> Result<TokenStream, EmitError> {
    Ok(match ty {
        ResolvedType::Array(inner) => {
            let inner = resolved_type_tokens(inner, span)?;
            quote! { #inner [] }
        }
        ResolvedType::Nullable(inner) => {
            let inner = resolved_type_tokens(inner, span)?;
            quote! { #inner ? }
        }
        ResolvedType::Span(inner) => {
            let inner = resolved_type_tokens(inner, span)?;
            quote! { Span < #inner > }
        }
        // `null` has no spelling as a type.
        ResolvedType::Null => quote! { object },
        other => path_tokens(&other.to_string(), span)?,
    })
}

/// Characters that would be invisible, or would end the line, if written raw.
fn is_hidden(c: char) -> bool {
    c.is_control()
        || matches!(
            c,
            '\u{00AD}' | '\u{200B}'..='\u{200F}' | '\u{2028}'..='\u{202E}' | '\u{2060}'..='\u{2064}' | '\u{FEFF}'
        )
}

fn simple_escape(c: char) -> Option<&'static str> {
    Some(match c {
        '\\' => "\\\\",
        '\n' => "\\n",
        '\r' => "\\r",
        '\t' => "\\t",
        '\0' => "\\0",
        _ => return None,
    })
}

/// A string constant.
pub fn string_literal(value: &str) -> Literal {
    let mut text = String::with_capacity(value.len() + 2);
    text.push('"');
    for c in value.chars() {
        if c == '"' {
            text.push_str("\\\"");
        } else if let Some(escape) = simple_escape(c) {
            text.push_str(escape);
        } else if is_hidden(c) && u32::from(c) <= 0x7FFF {
            // Always four digits: a shorter escape would absorb following hex digits.
            text.push_str(&format!("\\x{:04X}", u32::from(c)));
        } else {
            text.push(c);
        }
    }
    text.push('"');
    text.parse().unwrap_or_else(|_| Literal::string(value))
}

/// A character constant; hidden characters become a cast of their code point.
pub fn char_literal(value: char) -> TokenStream {
    if is_hidden(value) && simple_escape(value).is_none() {
        let code = u32::from(value);
        let lit = format!("0x{code:04X}")
            .parse()
            .unwrap_or_else(|_| Literal::u32_unsuffixed(code));
        return quote! { (char) #lit };
    }
    let text = match (value, simple_escape(value)) {
        ('\'', _) => "'\\''".to_string(),
        (_, Some(escape)) => format!("'{escape}'"),
        _ => format!("'{value}'"),
    };
    let lit = text.parse().unwrap_or_else(|_| Literal::character(value));
    quote! { #lit }
}

pub fn int_literal(value: i64) -> TokenStream {
    let lit = Literal::u64_unsuffixed(value.unsigned_abs());
    if value < 0 {
        quote! { - #lit }
    } else {
        quote! { #lit }
    }
}

pub fn float_literal(value: f64) -> TokenStream {
    if value.is_nan() {
        quote! { double.NaN }
    } else if value.is_infinite() {
        if value > 0.0 {
            quote! { double.PositiveInfinity }
        } else {
            quote! { double.NegativeInfinity }
        }
    } else {
        let lit = Literal::f64_unsuffixed(value.abs());
        if value.is_sign_negative() {
            quote! { - #lit }
        } else {
            quote! { #lit }
        }
    }
}

/// Emit a constant attribute argument.
pub fn attr_arg_tokens(arg: &AttributeArg, span: Span) -> Result<TokenStream, EmitError> {
    Ok(match &arg.value {
        AttrValue::Int(v) => int_literal(*v),
        AttrValue::Float(v) => float_literal(*v),
        AttrValue::String(s) => {
            let lit = string_literal(s);
            quote! { #lit }
        }
        AttrValue::Bool(true) => quote! { true },
        AttrValue::Bool(false) => quote! { false },
        AttrValue::Char(c) => char_literal(*c),
        AttrValue::Null => quote! { null },
        AttrValue::TypeOf(ty) => {
            let ty = resolved_type_tokens(ty, span)?;
            quote! { typeof(#ty) }
        }
        AttrValue::EnumMember { enum_type, member } => {
            let owner = path_tokens(enum_type, span)?;
            let member = target_ident(member, span)?;
            quote! { #owner . #member }
        }
        AttrValue::Array(items) => {
            let element = resolved_type_tokens(arg.ty.element().unwrap_or(&ResolvedType::Object), span)?;
            let items = items
                .iter()
                .map(|item| attr_arg_tokens(item, span))
                .collect::<Result<Vec<_>, _>>()?;
            quote! { new #element [] { #(#items),* } }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sable_core::lang::types::NumericTypeId;

    use crate::frontend::diagnostics::ErrorKind;

    fn at() -> Span {
        Span::new(4, 10)
    }

    #[test]
    fn test_type_tokens() {
        let span = ResolvedType::Span(Box::new(ResolvedType::Numeric(NumericTypeId::Byte)));
        assert_eq!(resolved_type_tokens(&span, at()).unwrap().to_string(), quote!(Span<byte>).to_string());

        let nullable = ResolvedType::Nullable(Box::new(ResolvedType::Numeric(NumericTypeId::Int)));
        assert_eq!(resolved_type_tokens(&nullable, at()).unwrap().to_string(), quote!(int?).to_string());

        let dotted = ResolvedType::array_of(ResolvedType::named("Acme.Widget"));
        assert_eq!(resolved_type_tokens(&dotted, at()).unwrap().to_string(), quote!(Acme.Widget[]).to_string());
    }

    #[test]
    fn test_negative_literals_keep_sign_as_punct() {
        assert_eq!(int_literal(-3).to_string(), quote!(-3).to_string());
        assert_eq!(int_literal(i64::MIN).to_string(), "- 9223372036854775808");
        assert_eq!(float_literal(-0.5).to_string(), quote!(-0.5).to_string());
        assert_eq!(float_literal(f64::NAN).to_string(), quote!(double.NaN).to_string());
    }

    #[test]
    fn test_attribute_argument_tokens() {
        let tags = AttributeArg::array(
            ResolvedType::String,
            vec![AttributeArg::string("a"), AttributeArg::string("b")],
        );
        assert_eq!(
            attr_arg_tokens(&tags, at()).unwrap().to_string(),
            quote!(new string[] { "a", "b" }).to_string()
        );
        assert_eq!(
            attr_arg_tokens(&AttributeArg::enum_member("Level", "High"), at()).unwrap().to_string(),
            quote!(Level.High).to_string()
        );
        assert_eq!(
            attr_arg_tokens(&AttributeArg::type_of(ResolvedType::named("User")), at()).unwrap().to_string(),
            quote!(typeof(User)).to_string()
        );
    }

    #[test]
    fn test_target_ident_rejects_non_identifiers() {
        assert_eq!(target_ident("value_1", at()).unwrap().to_string(), "value_1");
        assert_eq!(target_ident("_", at()).unwrap().to_string(), "_");

        for name in ["$scope", "1st", "a-b", "r#type", "", "two words"] {
            let err = target_ident(name, at()).unwrap_err();
            assert_eq!(err.diagnostic().kind, ErrorKind::InvalidTargetName, "{name:?}");
            assert_eq!(err.diagnostic().span, at());
            assert!(!err.diagnostic().is_internal());
        }

        let err = path_tokens("Acme.$Widget", at()).unwrap_err();
        assert!(err.diagnostic().message.contains("$Widget"));
        let err = attr_arg_tokens(&AttributeArg::enum_member("Level", "$High"), at()).unwrap_err();
        assert_eq!(err.diagnostic().kind, ErrorKind::InvalidTargetName);
    }

    #[test]
    fn test_string_constants_use_target_escapes() {
        assert_eq!(string_literal("plain").to_string(), r#""plain""#);
        assert_eq!(
            string_literal("say \"hi\"\\\n\t").to_string(),
            r#""say \"hi\"\\\n\t""#
        );
        // Zero-width space and DEL, each followed by a hex digit that must not join the escape.
        assert_eq!(string_literal("a\u{200B}b\u{7f}1").to_string(), r#""a\x200Bb\x007F1""#);
        assert_eq!(string_literal("\u{1}\u{85}\u{2028}").to_string(), r#""\x0001\x0085\x2028""#);
        assert!(!string_literal("caf\u{e9}").to_string().contains("\\u"));
    }

    #[test]
    fn test_char_constants_use_target_escapes() {
        assert_eq!(char_literal('a').to_string(), "'a'");
        assert_eq!(char_literal('\'').to_string(), r"'\''");
        assert_eq!(char_literal('\n').to_string(), r"'\n'");
        assert_eq!(char_literal('\u{7f}').to_string(), quote!((char) 0x007F).to_string());
        assert_eq!(char_literal('\u{200B}').to_string(), quote!((char) 0x200B).to_string());
        assert_eq!(
            attr_arg_tokens(&AttributeArg::char('\u{FEFF}'), at()).unwrap().to_string(),
            quote!((char) 0xFEFF).to_string()
        );
    }
}
