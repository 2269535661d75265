//! Placeholder Module
//!
//! Derives a base name for every interpolation site of a message and makes the
//! names unique within the message.

use crate::ast::{DataRefAccess, Expr, MarkupKind, MarkupNode, MsgChild, SelectKind};
use crate::error::{MsgError, Result};
use crate::i18n::message::is_valid_placeholder_name;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

/// Base name used for sites nothing better can be derived for.
pub const FALLBACK_NAME: &str = "XXX";
const PLURAL_FALLBACK_NAME: &str = "NUM";
const SELECT_FALLBACK_NAME: &str = "STATUS";
const GENDER_FALLBACK_NAME: &str = "GENDER";

lazy_static! {
    static ref TAG_TO_PLACEHOLDER_NAMES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("a", "LINK");
        m.insert("b", "BOLD");
        m.insert("br", "BREAK");
        m.insert("em", "EMPHASIS");
        m.insert("i", "ITALIC");
        m.insert("img", "IMAGE");
        m.insert("li", "ITEM");
        m.insert("ol", "ORDERED_LIST");
        m.insert("p", "PARAGRAPH");
        m.insert("ul", "UNORDERED_LIST");
        m
    };
    static ref VOID_TAGS: HashSet<&'static str> = [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ]
    .into_iter()
    .collect();
}

/// The names given to the placeholder sites of one message, in traversal
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderNames {
    names: Vec<String>,
    sources: IndexMap<String, String>,
}

impl PlaceholderNames {
    /// One name per site, in the order sites are visited.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Name of the `index`th site.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Placeholder name to the source text of its site.
    pub fn sources(&self) -> &IndexMap<String, String> {
        &self.sources
    }

    pub fn into_sources(self) -> IndexMap<String, String> {
        self.sources
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

struct Site {
    base_name: String,
    source: String,
}

/// Assign placeholder names to every site of a message body.
///
/// Sites are visited pre-order: a plural or select contributes its control
/// variable first, then the sites of its cases in source order, default last.
/// A base name used once is kept as is. A base name used more than once gets
/// `_1`, `_2`, ... on every occurrence, in visiting order.
pub fn assign_placeholder_names(body: &[MsgChild]) -> Result<PlaceholderNames> {
    let mut sites = Vec::new();
    collect_sites(body, &mut sites)?;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for site in &sites {
        *counts.entry(site.base_name.as_str()).or_default() += 1;
    }

    // Bare names are reserved up front so a numbered name never shadows one.
    let mut taken: HashSet<String> = counts
        .iter()
        .filter(|(_, count)| **count == 1)
        .map(|(base_name, _)| base_name.to_string())
        .collect();
    let mut next_suffix: HashMap<&str, usize> = HashMap::new();

    let mut names = Vec::with_capacity(sites.len());
    let mut sources = IndexMap::new();
    for site in &sites {
        let base_name = site.base_name.as_str();
        let name = if counts[base_name] == 1 {
            base_name.to_string()
        } else {
            let suffix = next_suffix.entry(base_name).or_insert(1);
            loop {
                let candidate = format!("{}_{}", base_name, suffix);
                *suffix += 1;
                if taken.insert(candidate.clone()) {
                    break candidate;
                }
            }
        };
        sources.insert(name.clone(), site.source.clone());
        names.push(name);
    }

    Ok(PlaceholderNames { names, sources })
}

fn collect_sites(body: &[MsgChild], sites: &mut Vec<Site>) -> Result<()> {
    for child in body {
        match child {
            MsgChild::RawText(_) => {}
            MsgChild::Print(print) => {
                let base_name = match &print.phname {
                    Some(phname) => phname_base_name(phname)?,
                    None => expr_base_name(&print.expr, FALLBACK_NAME),
                };
                sites.push(Site {
                    base_name,
                    source: print.to_string(),
                });
            }
            MsgChild::Call(call) => {
                let base_name = match &call.phname {
                    Some(phname) => phname_base_name(phname)?,
                    None => FALLBACK_NAME.to_string(),
                };
                sites.push(Site {
                    base_name,
                    source: call.to_string(),
                });
            }
            MsgChild::Markup(markup) => sites.push(Site {
                base_name: markup_base_name(markup),
                source: markup.source.clone(),
            }),
            MsgChild::Plural(plural) => {
                let mut seen = HashSet::new();
                for case in &plural.cases {
                    if !seen.insert(case.value) {
                        return Err(MsgError::DuplicatePluralCase { value: case.value });
                    }
                }
                sites.push(Site {
                    base_name: expr_base_name(&plural.expr, PLURAL_FALLBACK_NAME),
                    source: plural.expr.to_string(),
                });
                for case in &plural.cases {
                    collect_sites(&case.body, sites)?;
                }
                collect_sites(&plural.default, sites)?;
            }
            MsgChild::Select(select) => {
                let mut seen = HashSet::new();
                for case in &select.cases {
                    if !is_valid_select_case(&case.value) {
                        return Err(MsgError::InvalidSelectCase {
                            value: case.value.clone(),
                        });
                    }
                    if !seen.insert(case.value.as_str()) {
                        return Err(MsgError::DuplicateSelectCase {
                            value: case.value.clone(),
                        });
                    }
                }
                let fallback = match select.kind {
                    SelectKind::Select => SELECT_FALLBACK_NAME,
                    SelectKind::Gender => GENDER_FALLBACK_NAME,
                };
                sites.push(Site {
                    base_name: expr_base_name(&select.expr, fallback),
                    source: select.expr.to_string(),
                });
                for case in &select.cases {
                    collect_sites(&case.body, sites)?;
                }
                collect_sites(&select.default, sites)?;
            }
        }
    }
    Ok(())
}

/// Base name for an expression: the last field of a data reference, or the
/// last segment of a global. Other expressions get `fallback`.
pub fn expr_base_name(expr: &Expr, fallback: &str) -> String {
    let ident = match expr {
        Expr::DataRef(data_ref) => match data_ref.access.last() {
            None => data_ref.key.as_str(),
            Some(DataRefAccess::Field(field)) => field.as_str(),
            Some(DataRefAccess::Index(_)) => return fallback.to_string(),
        },
        Expr::Global(name) => name.rsplit('.').next().unwrap_or(name.as_str()),
        Expr::Other(_) => return fallback.to_string(),
    };

    let name = to_upper_underscore(ident);
    if is_valid_placeholder_name(&name) {
        name
    } else {
        fallback.to_string()
    }
}

fn phname_base_name(phname: &str) -> Result<String> {
    let name = to_upper_underscore(phname);
    if is_valid_placeholder_name(&name) {
        Ok(name)
    } else {
        Err(MsgError::InvalidPhname {
            phname: phname.to_string(),
        })
    }
}

/// `START_LINK` for `<a>`, `END_LINK` for `</a>`, `BREAK` for `<br>`.
pub fn markup_base_name(markup: &MarkupNode) -> String {
    let tag = markup.tag.to_ascii_lowercase();
    let mut tag_name = match TAG_TO_PLACEHOLDER_NAMES.get(tag.as_str()) {
        Some(name) => name.to_string(),
        None => to_snake_case(&tag),
    };
    if !is_valid_placeholder_name(&tag_name) {
        tag_name = FALLBACK_NAME.to_string();
    }

    match markup.kind {
        MarkupKind::Close => format!("END_{}", tag_name),
        MarkupKind::SelfClosing => tag_name,
        MarkupKind::Open if VOID_TAGS.contains(tag.as_str()) => tag_name,
        MarkupKind::Open => format!("START_{}", tag_name),
    }
}

fn to_snake_case(name: &str) -> String {
    name.to_uppercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn is_valid_select_case(value: &str) -> bool {
    !value.is_empty()
        && value != "other"
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Convert an identifier to UPPER_UNDERSCORE form.
///
/// Word boundaries are a letter followed by an upper case letter that starts a
/// lower case run, and any change between letters and digits.
pub fn to_upper_underscore(ident: &str) -> String {
    let chars: Vec<char> = ident.trim_matches('_').chars().collect();
    let mut out = String::with_capacity(chars.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = (prev.is_ascii_alphabetic() && ch.is_ascii_uppercase() && next_is_lower)
                || (prev.is_ascii_alphabetic() && ch.is_ascii_digit())
                || (prev.is_ascii_digit() && ch.is_ascii_alphabetic());
            if boundary {
                out.push('_');
            }
        }
        if ch == '_' && out.ends_with('_') {
            continue;
        }
        out.push(ch.to_ascii_uppercase());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CallNode, MsgPluralNode, PluralCase, PrintNode};

    #[test]
    fn test_to_upper_underscore() {
        assert_eq!(to_upper_underscore("eggs"), "EGGS");
        assert_eq!(to_upper_underscore("setName"), "SET_NAME");
        assert_eq!(to_upper_underscore("labsUrl"), "LABS_URL");
        assert_eq!(to_upper_underscore("HTMLParser"), "HTML_PARSER");
        assert_eq!(to_upper_underscore("item2go"), "ITEM_2_GO");
        assert_eq!(to_upper_underscore("__a__b_"), "A_B");
        assert_eq!(to_upper_underscore("user_name"), "USER_NAME");
    }

    #[test]
    fn test_expr_base_name() {
        assert_eq!(expr_base_name(&Expr::var("name"), "XXX"), "NAME");
        assert_eq!(
            expr_base_name(&Expr::field_path("user", &["firstName"]), "XXX"),
            "FIRST_NAME"
        );
        assert_eq!(expr_base_name(&Expr::global("app.MAX_ITEMS"), "XXX"), "MAX_ITEMS");
        assert_eq!(expr_base_name(&Expr::other("$a + $b"), "XXX"), "XXX");
        assert_eq!(expr_base_name(&Expr::other("length($list)"), "NUM"), "NUM");
    }

    #[test]
    fn test_index_access_falls_back() {
        let expr = Expr::DataRef(crate::ast::DataRef {
            key: "items".to_string(),
            access: vec![crate::ast::DataRefAccess::Index("0".to_string())],
        });
        assert_eq!(expr_base_name(&expr, "XXX"), "XXX");
    }

    #[test]
    fn test_markup_base_name() {
        assert_eq!(markup_base_name(&MarkupNode::open("a")), "START_LINK");
        assert_eq!(markup_base_name(&MarkupNode::close("a")), "END_LINK");
        assert_eq!(markup_base_name(&MarkupNode::open("br")), "BREAK");
        assert_eq!(markup_base_name(&MarkupNode::open("my-widget")), "START_MY_WIDGET");
        assert_eq!(
            markup_base_name(&MarkupNode::new("IMG", MarkupKind::SelfClosing, "<IMG/>")),
            "IMAGE"
        );
    }

    #[test]
    fn test_single_use_keeps_base_name() {
        let body = vec![
            MsgChild::print(Expr::var("name")),
            MsgChild::text(" and "),
            MsgChild::Call(CallNode::new(".foo", vec![])),
        ];
        let names = assign_placeholder_names(&body).unwrap();
        assert_eq!(names.names(), &["NAME".to_string(), "XXX".to_string()]);
    }

    #[test]
    fn test_repeated_base_name_numbers_every_occurrence() {
        let body = vec![
            MsgChild::Call(CallNode::new(".a", vec![])),
            MsgChild::print(Expr::var("x")),
            MsgChild::Call(CallNode::new(".b", vec![])),
            MsgChild::Call(CallNode::new(".a", vec![])),
        ];
        let names = assign_placeholder_names(&body).unwrap();
        assert_eq!(names.names(), &["XXX_1", "X", "XXX_2", "XXX_3"]);
    }

    #[test]
    fn test_numbering_skips_bare_names() {
        let body = vec![
            MsgChild::print(Expr::var("a")),
            MsgChild::Print(PrintNode::new(Expr::var("b")).with_phname("a_1")),
            MsgChild::print(Expr::var("a")),
        ];
        let names = assign_placeholder_names(&body).unwrap();
        assert_eq!(names.names(), &["A_2", "A_1", "A_3"]);
    }

    #[test]
    fn test_plural_control_variable_named_first() {
        let body = vec![MsgChild::Plural(MsgPluralNode::new(
            Expr::var("eggs"),
            vec![PluralCase::new(1, vec![MsgChild::text("one")])],
            vec![MsgChild::print(Expr::var("eggs"))],
        ))];
        let names = assign_placeholder_names(&body).unwrap();
        assert_eq!(names.names(), &["EGGS_1", "EGGS_2"]);
        assert_eq!(names.sources()["EGGS_1"], "$eggs");
        assert_eq!(names.sources()["EGGS_2"], "{$eggs}");
    }

    #[test]
    fn test_duplicate_plural_case() {
        let body = vec![MsgChild::Plural(MsgPluralNode::new(
            Expr::var("n"),
            vec![PluralCase::new(1, vec![]), PluralCase::new(1, vec![])],
            vec![],
        ))];
        assert_eq!(
            assign_placeholder_names(&body),
            Err(MsgError::DuplicatePluralCase { value: 1 })
        );
    }

    #[test]
    fn test_invalid_phname() {
        let body = vec![MsgChild::Print(PrintNode::new(Expr::var("a")).with_phname("9lives"))];
        assert!(matches!(
            assign_placeholder_names(&body),
            Err(MsgError::InvalidPhname { .. })
        ));
    }
}
