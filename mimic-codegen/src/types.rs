//! Rendering [`TypeRef`]s as Go source and naming their matchers.

use mimic_core::{GO_KEYWORDS, is_exported, to_pascal_case, upper_first};
use mimic_model::{ChanDir, PRIMITIVE_TYPES, TypeRef};
use mimic_source::syntax::guess_package_name;
use mimic_source::{Error, Result};

use crate::ImportSet;

/// Go spelling of `ty` in a file with the given imports.
pub fn render_type(ty: &TypeRef, imports: &ImportSet) -> String {
    match ty {
        TypeRef::Named {
            package: None,
            name,
        } => name.clone(),
        TypeRef::Named {
            package: Some(package),
            name,
        } => match imports.qualifier(package) {
            Some(alias) => format!("{}.{}", alias, name),
            None => name.clone(),
        },
        TypeRef::Pointer { elem } => format!("*{}", render_type(elem, imports)),
        TypeRef::Slice { elem } => format!("[]{}", render_type(elem, imports)),
        TypeRef::Array { len, elem } => format!("[{}]{}", len, render_type(elem, imports)),
        TypeRef::Map { key, value } => format!(
            "map[{}]{}",
            render_type(key, imports),
            render_type(value, imports)
        ),
        TypeRef::Chan { dir, elem } => {
            let inner = render_type(elem, imports);
            match dir {
                // `chan (<-chan T)` needs the parentheses
                ChanDir::Both if matches!(**elem, TypeRef::Chan { dir: ChanDir::Recv, .. }) => {
                    format!("chan ({})", inner)
                }
                ChanDir::Both => format!("chan {}", inner),
                ChanDir::Recv => format!("<-chan {}", inner),
                ChanDir::Send => format!("chan<- {}", inner),
            }
        }
        TypeRef::Func {
            params,
            results,
            variadic,
        } => {
            let mut rendered: Vec<String> = Vec::with_capacity(params.len());
            for (i, param) in params.iter().enumerate() {
                let is_last = i + 1 == params.len();
                match param {
                    TypeRef::Slice { elem } if *variadic && is_last => {
                        rendered.push(format!("...{}", render_type(elem, imports)));
                    }
                    _ => rendered.push(render_type(param, imports)),
                }
            }
            let mut out = format!("func({})", rendered.join(", "));
            match results.as_slice() {
                [] => {}
                [single] if !matches!(single, TypeRef::Func { .. }) => {
                    out.push(' ');
                    out.push_str(&render_type(single, imports));
                }
                many => {
                    let many: Vec<_> = many.iter().map(|r| render_type(r, imports)).collect();
                    out.push_str(&format!(" ({})", many.join(", ")));
                }
            }
            out
        }
        TypeRef::Literal { text } => text.clone(),
    }
}

/// `reflect.TypeOf((*T)(nil)).Elem()`, which also works for interface types.
///
/// `reflect` is the qualifier the file imports the `reflect` package under.
pub fn reflect_type_of(reflect: &str, rendered: &str) -> String {
    format!("{}.TypeOf((*{})(nil)).Elem()", reflect, rendered)
}

/// Exported Go identifier naming `ty` in matcher helpers.
///
/// `*http.Request` → `PtrToHttpRequest`, `map[string][]int` →
/// `MapOfStringToSliceOfInt`.
pub fn matcher_name(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Named {
            package: None,
            name,
        } if name == "interface{}" || name == "any" => "Interface".to_string(),
        TypeRef::Named {
            package: None,
            name,
        } => upper_first(name),
        TypeRef::Named {
            package: Some(package),
            name,
        } => format!(
            "{}{}",
            upper_first(&guess_package_name(package)),
            upper_first(name)
        ),
        TypeRef::Pointer { elem } => format!("PtrTo{}", matcher_name(elem)),
        TypeRef::Slice { elem } => format!("SliceOf{}", matcher_name(elem)),
        TypeRef::Array { len, elem } => format!("ArrayOf{}{}", len, matcher_name(elem)),
        TypeRef::Map { key, value } => {
            format!("MapOf{}To{}", matcher_name(key), matcher_name(value))
        }
        TypeRef::Chan { dir, elem } => {
            let prefix = match dir {
                ChanDir::Both => "ChanOf",
                ChanDir::Recv => "RecvChanOf",
                ChanDir::Send => "SendChanOf",
            };
            format!("{}{}", prefix, matcher_name(elem))
        }
        TypeRef::Func {
            params,
            results,
            variadic,
        } => {
            let mut out = String::from("Func");
            for (i, param) in params.iter().enumerate() {
                if *variadic && i + 1 == params.len() {
                    out.push_str("Variadic");
                }
                out.push_str(&matcher_name(param));
            }
            if !results.is_empty() {
                out.push_str("Ret");
                for result in results {
                    out.push_str(&matcher_name(result));
                }
            }
            out
        }
        TypeRef::Literal { text } => {
            let words: String = text
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
                .collect();
            let name = to_pascal_case(&words);
            if name == "Struct" || name == "Interface" {
                format!("Empty{}", name)
            } else {
                name
            }
        }
    }
}

/// Check that `ty` can be spelled in a file whose own package is `self_package`.
///
/// `source_package` and `source_package_name` describe the interface's
/// declaring package.
pub fn check_resolvable(
    ty: &TypeRef,
    self_package: Option<&str>,
    source_package: &str,
    source_package_name: &str,
) -> Result<()> {
    let fail = |reason: &str| {
        Err(Error::unresolvable(
            describe(ty),
            self_package.unwrap_or("<matchers>"),
            reason,
        ))
    };

    match ty {
        TypeRef::Named {
            package: Some(package),
            name,
        } => {
            if Some(package.as_str()) == self_package {
                return Ok(());
            }
            if !is_exported(name) {
                return fail("unexported types of another package cannot be referenced; generate the mock into the declaring package with --package and --self-package");
            }
            if package == source_package && source_package_name == "main" {
                return fail("package main cannot be imported; generate the mock into the same package");
            }
            Ok(())
        }
        TypeRef::Named { package: None, .. } => Ok(()),
        TypeRef::Literal { .. } if self_package == Some(source_package) => Ok(()),
        TypeRef::Literal { text } => {
            if text.contains('.') {
                return fail("anonymous types that mention other packages are copied verbatim and cannot be re-qualified");
            }
            match local_type_names(text).first() {
                Some(name) => {
                    let reason = format!(
                        "anonymous types are copied verbatim and '{}' is only visible in its own package; generate the mock into the declaring package with --package and --self-package",
                        name
                    );
                    fail(reason.as_str())
                }
                None => Ok(()),
            }
        }
        TypeRef::Pointer { elem }
        | TypeRef::Slice { elem }
        | TypeRef::Array { elem, .. }
        | TypeRef::Chan { elem, .. } => {
            check_resolvable(elem, self_package, source_package, source_package_name)
        }
        TypeRef::Map { key, value } => {
            check_resolvable(key, self_package, source_package, source_package_name)?;
            check_resolvable(value, self_package, source_package, source_package_name)
        }
        TypeRef::Func {
            params, results, ..
        } => params
            .iter()
            .chain(results)
            .try_for_each(|t| check_resolvable(t, self_package, source_package, source_package_name)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Punct(&'a str),
    Number,
    Str,
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let is_ident = |c: char| c == '_' || c.is_alphanumeric();
    let mut tokens = Vec::new();
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        let len = if c.is_whitespace() {
            c.len_utf8()
        } else if c == '_' || c.is_alphabetic() {
            let len = rest.find(|c: char| !is_ident(c)).unwrap_or(rest.len());
            tokens.push(Token::Ident(&rest[..len]));
            len
        } else if c.is_ascii_digit() {
            tokens.push(Token::Number);
            rest.find(|c: char| !is_ident(c)).unwrap_or(rest.len())
        } else if c == '"' || c == '`' {
            tokens.push(Token::Str);
            let mut escaped = false;
            let close = rest[1..].find(|d: char| {
                let hit = d == c && !escaped;
                escaped = c == '"' && d == '\\' && !escaped;
                hit
            });
            close.map_or(rest.len(), |i| i + 2)
        } else {
            let len = if rest.starts_with("...") {
                3
            } else if rest.starts_with("<-") {
                2
            } else {
                c.len_utf8()
            };
            tokens.push(Token::Punct(&rest[..len]));
            len
        };
        rest = &rest[len..];
    }
    tokens
}

fn is_predeclared(name: &str) -> bool {
    PRIMITIVE_TYPES.contains(&name)
        || matches!(name, "error" | "any" | "comparable" | "true" | "false" | "nil" | "iota" | "_")
}

/// Whether the identifiers starting `tokens` are field, method or parameter names.
///
/// `X, Y int` and `Get(` declare names; `Item, error)` and `Item }` are types.
fn declares_names(tokens: &[Token<'_>]) -> bool {
    let mut j = 0;
    loop {
        match tokens.get(j) {
            Some(Token::Ident(name)) if !GO_KEYWORDS.contains(name) => {}
            _ => return false,
        }
        match tokens.get(j + 1) {
            Some(Token::Punct(",")) => j += 2,
            Some(Token::Ident(_)) => return true,
            Some(Token::Punct(p)) => return matches!(*p, "*" | "[" | "(" | "..." | "<-"),
            _ => return false,
        }
    }
}

/// Unqualified names a struct or interface literal uses as types or constants.
fn local_type_names(text: &str) -> Vec<&str> {
    let tokens = tokenize(text);
    let mut names = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let Token::Ident(ident) = tokens[i] else {
            i += 1;
            continue;
        };
        let at_entry = i == 0 || matches!(tokens[i - 1], Token::Punct("{" | ";" | "(" | ","));
        if at_entry && declares_names(&tokens[i..]) {
            while let Some(Token::Ident(_)) = tokens.get(i) {
                i += 1;
                if tokens.get(i) != Some(&Token::Punct(",")) {
                    break;
                }
                i += 1;
            }
            continue;
        }
        if !is_predeclared(ident) && !GO_KEYWORDS.contains(&ident) {
            names.push(ident);
        }
        i += 1;
    }
    names
}

/// Fully qualified spelling for error messages.
fn describe(ty: &TypeRef) -> String {
    let everything = ImportSet::default();
    match ty {
        TypeRef::Named {
            package: Some(package),
            name,
        } => format!("{}.{}", package, name),
        other => render_type(other, &everything),
    }
}
