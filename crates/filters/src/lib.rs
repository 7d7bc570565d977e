//! Document and ISD transforms.
//!
//! Filters come in two shapes: [`DocumentFilter`]s rewrite a document
//! before ISD generation, [`IsdFilter`]s rewrite one ISD snapshot before a
//! writer serializes it. Both must leave their input's invariants intact.
//! Named document filters are registered in a table the CLI looks up.

pub mod doc;
pub mod isd_filters;

use model::{Document, Error};

/// A named document-to-document transform.
pub trait DocumentFilter {
    fn name(&self) -> &'static str;
    fn process(&self, doc: &mut Document) -> Result<(), Error>;
}

/// An ISD-to-ISD transform.
pub trait IsdFilter {
    fn process(&self, isd: &mut isd::Isd) -> Result<(), Error>;
}

/// Instantiates a registered document filter from its JSON configuration
/// section. Returns `None` for unknown names.
pub fn document_filter(
    name: &str,
    config: Option<&serde_json::Value>,
) -> Option<Result<Box<dyn DocumentFilter>, Error>> {
    match name {
        "lcd" => Some(doc::lcd::LcdFilter::from_config(config).map(|f| {
            let boxed: Box<dyn DocumentFilter> = Box::new(f);
            boxed
        })),
        "remove-animations" => Some(Ok(Box::new(doc::RemoveAnimations))),
        _ => None,
    }
}
