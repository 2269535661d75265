//! Template AST Module
//!
//! Node shapes handed over by the template parser. Only what the message
//! passes read is modelled here, plus the computed fields they write back
//! onto `MsgNode`.

use crate::i18n::message::Part;
use indexmap::IndexMap;
use std::fmt;

/// All the templates known to a loading pipeline, in load order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pub templates: Vec<Template>,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            templates: Vec::new(),
        }
    }

    pub fn add(&mut self, template: Template) {
        self.templates.push(template);
    }

    pub fn template(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct Template {
    pub name: String,
    pub node: Node,
}

impl Template {
    pub fn new(name: impl Into<String>, body: Vec<Node>) -> Self {
        Template {
            name: name.into(),
            node: Node::Block(BlockNode::new("template", body)),
        }
    }
}

/// A node of a template body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Any construct holding further nodes: `{if}`, `{for}`, `{switch}` cases...
    Block(BlockNode),
    RawText(String),
    Print(PrintNode),
    Call(CallNode),
    Msg(MsgNode),
}

impl Node {
    /// Nodes nested under this one: block children and call parameter
    /// bodies. Message bodies are not template nodes and are not included.
    pub fn children(&self) -> impl Iterator<Item = &Node> + '_ {
        let lists: Vec<&Vec<Node>> = match self {
            Node::Block(block) => vec![&block.children],
            Node::Call(call) => call
                .params
                .iter()
                .filter_map(|param| match &param.value {
                    ParamValue::Content(children) => Some(children),
                    ParamValue::Expr(_) => None,
                })
                .collect(),
            Node::RawText(_) | Node::Print(_) | Node::Msg(_) => Vec::new(),
        };
        lists.into_iter().flatten()
    }

    pub fn children_mut(&mut self) -> impl Iterator<Item = &mut Node> + '_ {
        let lists: Vec<&mut Vec<Node>> = match self {
            Node::Block(block) => vec![&mut block.children],
            Node::Call(call) => call
                .params
                .iter_mut()
                .filter_map(|param| match &mut param.value {
                    ParamValue::Content(children) => Some(children),
                    ParamValue::Expr(_) => None,
                })
                .collect(),
            Node::RawText(_) | Node::Print(_) | Node::Msg(_) => Vec::new(),
        };
        lists.into_iter().flatten()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Block(block) => {
                write!(f, "{{{}}}", block.name)?;
                for child in &block.children {
                    write!(f, "{}", child)?;
                }
                write!(f, "{{/{}}}", block.name)
            }
            Node::RawText(text) => f.write_str(text),
            Node::Print(print) => write!(f, "{}", print),
            Node::Call(call) => write!(f, "{}", call),
            Node::Msg(msg) => write!(f, "{{msg desc={:?}}}...{{/msg}}", msg.desc),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockNode {
    pub name: String,
    pub children: Vec<Node>,
}

impl BlockNode {
    pub fn new(name: impl Into<String>, children: Vec<Node>) -> Self {
        BlockNode {
            name: name.into(),
            children,
        }
    }
}

/// A `{msg}` node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MsgNode {
    pub meaning: String,
    pub desc: String,
    pub body: Vec<MsgChild>,

    // Computed by the message id pass
    /// Set once `id`, `parts` and `placeholders` hold computed values.
    pub processed: bool,
    pub id: u64,
    pub parts: Vec<Part>,
    /// Placeholder name to the source text of the site it stands for.
    pub placeholders: IndexMap<String, String>,
}

impl MsgNode {
    pub fn new(meaning: impl Into<String>, desc: impl Into<String>, body: Vec<MsgChild>) -> Self {
        MsgNode {
            meaning: meaning.into(),
            desc: desc.into(),
            body,
            ..Default::default()
        }
    }

    /// Drop the computed fields.
    pub fn reset(&mut self) {
        self.processed = false;
        self.id = 0;
        self.parts.clear();
        self.placeholders.clear();
    }
}

/// Content of a message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MsgChild {
    RawText(String),
    Print(PrintNode),
    Call(CallNode),
    Plural(MsgPluralNode),
    Select(MsgSelectNode),
    Markup(MarkupNode),
}

impl MsgChild {
    pub fn text(value: impl Into<String>) -> Self {
        MsgChild::RawText(value.into())
    }

    pub fn print(expr: Expr) -> Self {
        MsgChild::Print(PrintNode::new(expr))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintNode {
    pub expr: Expr,
    /// User supplied placeholder name (`phname="..."`).
    pub phname: Option<String>,
}

impl PrintNode {
    pub fn new(expr: Expr) -> Self {
        PrintNode { expr, phname: None }
    }

    pub fn with_phname(mut self, phname: impl Into<String>) -> Self {
        self.phname = Some(phname.into());
        self
    }
}

impl fmt::Display for PrintNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.expr)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallNode {
    pub callee: String,
    pub params: Vec<CallParam>,
    pub phname: Option<String>,
}

impl CallNode {
    pub fn new(callee: impl Into<String>, params: Vec<CallParam>) -> Self {
        CallNode {
            callee: callee.into(),
            params,
            phname: None,
        }
    }

    pub fn with_phname(mut self, phname: impl Into<String>) -> Self {
        self.phname = Some(phname.into());
        self
    }
}

impl fmt::Display for CallNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            return write!(f, "{{call {} /}}", self.callee);
        }
        write!(f, "{{call {}}}", self.callee)?;
        for param in &self.params {
            match &param.value {
                ParamValue::Expr(expr) => write!(f, "{{param {}: {} /}}", param.key, expr)?,
                ParamValue::Content(children) => {
                    write!(f, "{{param {}}}", param.key)?;
                    for child in children {
                        write!(f, "{}", child)?;
                    }
                    write!(f, "{{/param}}")?;
                }
            }
        }
        write!(f, "{{/call}}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallParam {
    pub key: String,
    pub value: ParamValue,
}

impl CallParam {
    /// `{param key: expr /}`
    pub fn new(key: impl Into<String>, value: Expr) -> Self {
        CallParam {
            key: key.into(),
            value: ParamValue::Expr(value),
        }
    }

    /// `{param key}...{/param}`
    pub fn content(key: impl Into<String>, children: Vec<Node>) -> Self {
        CallParam {
            key: key.into(),
            value: ParamValue::Content(children),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Expr(Expr),
    Content(Vec<Node>),
}

/// `{plural}` inside a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgPluralNode {
    pub expr: Expr,
    pub offset: u32,
    /// Explicit `{case N}` branches in source order.
    pub cases: Vec<PluralCase>,
    /// The `{default}` branch.
    pub default: Vec<MsgChild>,
}

impl MsgPluralNode {
    pub fn new(expr: Expr, cases: Vec<PluralCase>, default: Vec<MsgChild>) -> Self {
        MsgPluralNode {
            expr,
            offset: 0,
            cases,
            default,
        }
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralCase {
    pub value: u32,
    pub body: Vec<MsgChild>,
}

impl PluralCase {
    pub fn new(value: u32, body: Vec<MsgChild>) -> Self {
        PluralCase { value, body }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectKind {
    Select,
    Gender,
}

/// `{select}` inside a message, or a gender selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgSelectNode {
    pub kind: SelectKind,
    pub expr: Expr,
    pub cases: Vec<SelectCase>,
    pub default: Vec<MsgChild>,
}

impl MsgSelectNode {
    pub fn new(expr: Expr, cases: Vec<SelectCase>, default: Vec<MsgChild>) -> Self {
        MsgSelectNode {
            kind: SelectKind::Select,
            expr,
            cases,
            default,
        }
    }

    pub fn gender(expr: Expr, cases: Vec<SelectCase>, default: Vec<MsgChild>) -> Self {
        MsgSelectNode {
            kind: SelectKind::Gender,
            expr,
            cases,
            default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectCase {
    pub value: String,
    pub body: Vec<MsgChild>,
}

impl SelectCase {
    pub fn new(value: impl Into<String>, body: Vec<MsgChild>) -> Self {
        SelectCase {
            value: value.into(),
            body,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupKind {
    Open,
    Close,
    SelfClosing,
}

/// An HTML tag boundary inside a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupNode {
    pub tag: String,
    pub kind: MarkupKind,
    /// Tag text as written, e.g. `<a href="{$url}">`.
    pub source: String,
}

impl MarkupNode {
    pub fn new(tag: impl Into<String>, kind: MarkupKind, source: impl Into<String>) -> Self {
        MarkupNode {
            tag: tag.into(),
            kind,
            source: source.into(),
        }
    }

    pub fn open(tag: &str) -> Self {
        MarkupNode::new(tag, MarkupKind::Open, format!("<{}>", tag))
    }

    pub fn close(tag: &str) -> Self {
        MarkupNode::new(tag, MarkupKind::Close, format!("</{}>", tag))
    }
}

/// The expression forms placeholder naming can see through. Anything else is
/// kept as opaque source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    DataRef(DataRef),
    /// A dotted global or constant, e.g. `app.MAX_ITEMS`.
    Global(String),
    Other(String),
}

impl Expr {
    /// `$name`
    pub fn var(name: impl Into<String>) -> Self {
        Expr::DataRef(DataRef {
            key: name.into(),
            access: Vec::new(),
        })
    }

    /// `$name.f1.f2...`
    pub fn field_path(name: impl Into<String>, fields: &[&str]) -> Self {
        Expr::DataRef(DataRef {
            key: name.into(),
            access: fields
                .iter()
                .map(|f| DataRefAccess::Field(f.to_string()))
                .collect(),
        })
    }

    pub fn global(name: impl Into<String>) -> Self {
        Expr::Global(name.into())
    }

    pub fn other(source: impl Into<String>) -> Self {
        Expr::Other(source.into())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::DataRef(data_ref) => write!(f, "{}", data_ref),
            Expr::Global(name) => f.write_str(name),
            Expr::Other(source) => f.write_str(source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRef {
    pub key: String,
    pub access: Vec<DataRefAccess>,
}

impl fmt::Display for DataRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.key)?;
        for access in &self.access {
            match access {
                DataRefAccess::Field(name) => write!(f, ".{}", name)?,
                DataRefAccess::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataRefAccess {
    Field(String),
    /// Index access, holding the index expression's source text.
    Index(String),
}
