use ymc_ast::Value;

/// The kind of node a tag definition is declared to apply to
/// (`SPEC_FULL.md` §4.6.5).
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum TagKind {
    Scalar,
    Map,
    Seq,
}

/// A single custom tag's resolve step: takes the already-resolved untagged
/// value and either transforms it or rejects it.
pub trait TagResolver: Send + Sync {
    fn tag(&self) -> &str;
    fn kind(&self) -> TagKind;
    fn resolve(&self, data: &Value) -> Result<Value, String>;
}

/// An ordered collection of tag definitions consulted during resolution.
/// An empty schema means every tag is unknown.
#[derive(Default)]
pub struct Schema {
    resolvers: Vec<Box<dyn TagResolver>>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolver(mut self, resolver: Box<dyn TagResolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }

    pub fn find(&self, tag: &str) -> Option<&dyn TagResolver> {
        self.resolvers.iter().find(|r| r.tag() == tag).map(AsRef::as_ref)
    }
}
