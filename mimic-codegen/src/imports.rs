//! Import collection for generated Go files.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use mimic_core::GO_KEYWORDS;
use mimic_model::PRIMITIVE_TYPES;
use mimic_source::syntax::guess_package_name;

/// Imports of one generated file, with a unique qualifier per package.
///
/// Aliases are assigned in import path order, so the same set of packages
/// always yields the same aliases.
///
/// # Example
///
/// ```
/// use mimic_codegen::ImportSet;
///
/// let imports = ImportSet::new(["example.com/a/http", "net/http"], None);
/// assert_eq!(imports.qualifier("example.com/a/http"), Some("http"));
/// assert_eq!(imports.qualifier("net/http"), Some("http2"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    /// Import path -> alias, in import path order.
    aliases: IndexMap<String, String>,
    self_package: Option<String>,
}

impl ImportSet {
    /// Build the import set for `packages`, leaving out `self_package`.
    pub fn new<I, S>(packages: I, self_package: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sorted: BTreeSet<String> = packages
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .filter(|p| Some(p.as_str()) != self_package)
            .collect();

        let mut aliases: IndexMap<String, String> = IndexMap::new();
        let mut taken: BTreeSet<String> = BTreeSet::new();
        for path in sorted {
            let base = sanitize(&guess_package_name(&path));
            let mut alias = base.clone();
            let mut n = 2;
            while taken.contains(&alias) || is_reserved(&alias) {
                alias = format!("{}{}", base, n);
                n += 1;
            }
            taken.insert(alias.clone());
            aliases.insert(path, alias);
        }

        Self {
            aliases,
            self_package: self_package.map(str::to_string),
        }
    }

    /// Qualifier for a package, `None` for the file's own package.
    pub fn qualifier(&self, path: &str) -> Option<&str> {
        self.aliases.get(path).map(String::as_str)
    }

    pub fn is_self(&self, path: &str) -> bool {
        self.self_package.as_deref() == Some(path)
    }

    /// Whether `name` is used as a package qualifier in this file.
    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.values().any(|alias| alias == name)
    }

    /// Iterate over `(path, alias)` in import path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Render an `import ( ... )` block, standard library first.
    pub fn render(&self) -> String {
        if self.aliases.is_empty() {
            return String::new();
        }

        let (std, other): (Vec<_>, Vec<_>) = self.iter().partition(|(path, _)| is_std(path));
        let mut out = String::from("import (\n");
        for (path, alias) in &std {
            out.push_str(&import_line(path, alias));
        }
        if !std.is_empty() && !other.is_empty() {
            out.push('\n');
        }
        for (path, alias) in &other {
            out.push_str(&import_line(path, alias));
        }
        out.push_str(")\n");
        out
    }
}

/// Always aliased: a package's declared name need not match its directory.
fn import_line(path: &str, alias: &str) -> String {
    format!("\t{} \"{}\"\n", alias, path)
}

/// Identifiers a package qualifier must not shadow in generated code.
const GENERATED_LOCALS: &[&str] = &[
    "c",
    "fh",
    "inOrderContext",
    "invocationCountMatcher",
    "matcher",
    "methodInvocations",
    "mock",
    "nullValue",
    "option",
    "options",
    "param",
    "timeout",
    "value",
    "verifier",
];

fn is_reserved(name: &str) -> bool {
    GO_KEYWORDS.contains(&name)
        || PRIMITIVE_TYPES.contains(&name)
        || matches!(name, "error" | "any" | "nil" | "len" | "make" | "append" | "panic")
        || GENERATED_LOCALS.contains(&name)
}

fn is_std(path: &str) -> bool {
    !path.split('/').next().is_some_and(|first| first.contains('.'))
}

fn sanitize(name: &str) -> String {
    let name: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("pkg{}", name)
    } else {
        name
    }
}
