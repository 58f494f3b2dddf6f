//! Attribute catalog: maps attribute names to wire codes, encoders and
//! node getters.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use br_domain::config::{Config, ConfigSeverity};
use br_domain::trace::TraceEvent;
use br_domain::{Error, Result};
use br_protocol::{AttributeCode, AttributeName, AttributeValue, Encoding};

use crate::node::DomNode;

/// Reads one attribute off a node.  `None` means the node has no getter
/// for it.
pub type Accessor = Arc<dyn Fn(&dyn DomNode) -> Option<AttributeValue> + Send + Sync>;

/// One row of the catalog, for listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: AttributeName,
    pub code: Option<AttributeCode>,
    pub encoding: Option<Encoding>,
}

/// Immutable attribute tables, built once at start-up and shared by
/// reference with every notifier.
///
/// ```rust,no_run
/// # use br_node_sdk::{AttributeCatalog, AttributeCode, AttributeName, Encoding};
/// let mut builder = AttributeCatalog::builder();
/// builder
///     .add_attribute(AttributeName::Text, AttributeCode(3))
///     .add_attribute(AttributeName::Rects, AttributeCode(0))
///     .add_custom("Title", AttributeCode(20), Encoding::PassThrough);
/// let catalog = builder.build();
/// ```
#[derive(Clone)]
pub struct AttributeCatalog {
    codes: HashMap<AttributeName, AttributeCode>,
    names: HashMap<AttributeCode, AttributeName>,
    encoders: HashMap<AttributeName, Encoding>,
    accessors: HashMap<AttributeName, Accessor>,
}

impl AttributeCatalog {
    /// A builder pre-populated with the encoders and getters of every
    /// built-in attribute, but no codes.
    pub fn builder() -> AttributeCatalogBuilder {
        AttributeCatalogBuilder::new()
    }

    /// Build the catalog from the `[attributes]` table and
    /// `[[custom_attributes]]` of a config file.
    ///
    /// Fails with [`Error::Config`] when [`Config::validate`] reports any
    /// error-level issue, such as two names sharing one code.
    pub fn from_config(config: &Config) -> Result<Self> {
        let errors: Vec<String> = config
            .validate()
            .into_iter()
            .filter(|issue| issue.severity == ConfigSeverity::Error)
            .map(|issue| format!("{}: {}", issue.field, issue.message))
            .collect();
        if !errors.is_empty() {
            tracing::warn!(count = errors.len(), "refusing to build catalog from invalid config");
            return Err(Error::Config(errors.join("; ")));
        }

        let mut builder = Self::builder();
        for (name, code) in &config.attributes {
            builder.try_add_attribute(name, *code)?;
        }
        for custom in &config.custom_attributes {
            let encoding: Encoding = custom.encoding.parse().map_err(|_| {
                Error::Config(format!(
                    "custom attribute '{}': unknown encoding '{}'",
                    custom.name, custom.encoding
                ))
            })?;
            builder.try_add_attribute(&custom.name, custom.code)?;
            builder.add_encoder(custom.name.as_str(), encoding);
        }
        Ok(builder.build())
    }

    /// Wire code of `name`.
    pub fn code(&self, name: &AttributeName) -> Result<AttributeCode> {
        match self.codes.get(name) {
            Some(code) => Ok(*code),
            None => {
                tracing::warn!(attribute = %name, "no code registered for attribute");
                Err(Error::UnknownAttributeCode(name.to_string()))
            }
        }
    }

    /// Reverse lookup, for decoding on the host side.
    pub fn name_for(&self, code: AttributeCode) -> Option<&AttributeName> {
        self.names.get(&code)
    }

    pub fn encoding(&self, name: &AttributeName) -> Option<Encoding> {
        self.encoders.get(name).copied()
    }

    /// Encode `value` with the encoder registered for `name`.
    pub fn encode(&self, name: &AttributeName, value: &AttributeValue) -> Result<String> {
        let encoding = self
            .encoding(name)
            .ok_or_else(|| Error::UnknownAttribute(name.to_string()))?;
        encoding.encode(name, value)
    }

    /// Read `name` off `node` through the registered getter.
    pub fn fetch(&self, name: &AttributeName, node: &dyn DomNode) -> Result<AttributeValue> {
        let missing = || Error::MissingGetter {
            attribute: name.to_string(),
            node_id: node.id(),
        };
        let accessor = self.accessors.get(name).ok_or_else(missing)?;
        accessor(node).ok_or_else(missing)
    }

    /// Every attribute that has a code or an encoder, ordered by code
    /// (uncoded entries last, by name).
    pub fn entries(&self) -> Vec<CatalogEntry> {
        let mut names: Vec<&AttributeName> = self.codes.keys().collect();
        names.extend(self.encoders.keys().filter(|n| !self.codes.contains_key(*n)));
        let mut entries: Vec<CatalogEntry> = names
            .into_iter()
            .map(|name| CatalogEntry {
                name: name.clone(),
                code: self.codes.get(name).copied(),
                encoding: self.encoding(name),
            })
            .collect();
        entries.sort_by(|a, b| match (a.code, b.code) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.name.cmp(&b.name),
        });
        entries
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl fmt::Debug for AttributeCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeCatalog")
            .field("codes", &self.codes)
            .field("encoders", &self.encoders)
            .field("accessors", &self.accessors.len())
            .finish()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Builder
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Mutable registration phase of an [`AttributeCatalog`].
///
/// Registrations are single-key overwrites: the last write for a name
/// wins, and a rejected registration leaves the tables untouched.  Codes
/// are owned the same way: giving a code to a second name unregisters
/// the first.
pub struct AttributeCatalogBuilder {
    codes: HashMap<AttributeName, AttributeCode>,
    names: HashMap<AttributeCode, AttributeName>,
    encoders: HashMap<AttributeName, Encoding>,
    accessors: HashMap<AttributeName, Accessor>,
}

impl AttributeCatalogBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            codes: HashMap::new(),
            names: HashMap::new(),
            encoders: HashMap::new(),
            accessors: HashMap::new(),
        };
        for name in AttributeName::BUILTIN {
            if let Some(encoding) = name.default_encoding() {
                builder.encoders.insert(name.clone(), encoding);
            }
            builder.accessors.insert(name.clone(), builtin_accessor(&name));
        }
        builder
    }

    /// Register (or re-register) the wire code of an attribute.
    ///
    /// Returns `&mut Self` for method chaining.
    pub fn add_attribute(
        &mut self,
        name: impl Into<AttributeName>,
        code: AttributeCode,
    ) -> &mut Self {
        let name = name.into();
        let replaced = self.codes.insert(name.clone(), code);
        if let Some(old) = replaced {
            tracing::debug!(attribute = %name, old = %old, new = %code, "attribute code overwritten");
            if old != code {
                self.names.remove(&old);
            }
        }
        // A code belongs to one name; the previous holder loses it.
        if let Some(holder) = self.names.insert(code, name.clone()) {
            if holder != name {
                tracing::debug!(
                    attribute = %holder,
                    code = %code,
                    replaced_by = %name,
                    "attribute code reassigned"
                );
                self.codes.remove(&holder);
            }
        }
        if !self.accessors.contains_key(&name) {
            self.accessors.insert(name.clone(), custom_accessor(&name));
        }
        TraceEvent::AttributeRegistered {
            name: name.to_string(),
            code: code.get(),
            replaced: replaced.map(AttributeCode::get),
        }
        .emit();
        self
    }

    /// Register a code from untyped input (config files, FFI).
    ///
    /// Fails with [`Error::InvalidArgument`] for an empty name or a code
    /// that is not a `u32`; the tables are left unchanged in that case.
    pub fn try_add_attribute(&mut self, name: &str, code: i64) -> Result<&mut Self> {
        if name.is_empty() {
            tracing::warn!(code, "rejected attribute registration with empty name");
            return Err(Error::InvalidArgument(format!(
                "attribute name for code {code} is empty"
            )));
        }
        let code = AttributeCode::try_from(code).map_err(|e| {
            tracing::warn!(attribute = name, code, "rejected attribute registration");
            e
        })?;
        Ok(self.add_attribute(name, code))
    }

    /// Register (or replace) the encoder of an attribute.
    pub fn add_encoder(&mut self, name: impl Into<AttributeName>, encoding: Encoding) -> &mut Self {
        let name = name.into();
        if !self.accessors.contains_key(&name) {
            self.accessors.insert(name.clone(), custom_accessor(&name));
        }
        self.encoders.insert(name, encoding);
        self
    }

    /// Register a custom attribute's code and encoder in one go.  Its
    /// value is read through [`DomNode::custom_attribute`].
    pub fn add_custom(
        &mut self,
        name: impl Into<AttributeName>,
        code: AttributeCode,
        encoding: Encoding,
    ) -> &mut Self {
        let name = name.into();
        self.add_encoder(name.clone(), encoding);
        self.add_attribute(name, code)
    }

    /// Replace the getter used for `name`.
    pub fn with_accessor<F>(&mut self, name: impl Into<AttributeName>, accessor: F) -> &mut Self
    where
        F: Fn(&dyn DomNode) -> Option<AttributeValue> + Send + Sync + 'static,
    {
        self.accessors.insert(name.into(), Arc::new(accessor));
        self
    }

    pub fn build(self) -> AttributeCatalog {
        TraceEvent::CatalogBuilt {
            codes: self.codes.len(),
            encoders: self.encoders.len(),
        }
        .emit();
        AttributeCatalog {
            codes: self.codes,
            names: self.names,
            encoders: self.encoders,
            accessors: self.accessors,
        }
    }
}

impl Default for AttributeCatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn builtin_accessor(name: &AttributeName) -> Accessor {
    match name {
        AttributeName::Rects => Arc::new(|n: &dyn DomNode| n.rects().map(AttributeValue::Rects)),
        AttributeName::FixedId => {
            Arc::new(|n: &dyn DomNode| Some(AttributeValue::Integer(n.fixed_id())))
        }
        AttributeName::OverflowId => {
            Arc::new(|n: &dyn DomNode| n.overflow_id().map(AttributeValue::Integer))
        }
        AttributeName::Text => Arc::new(|n: &dyn DomNode| n.text().map(AttributeValue::Text)),
        AttributeName::IsPassword => {
            Arc::new(|n: &dyn DomNode| n.is_password().map(AttributeValue::Bool))
        }
        AttributeName::Url => Arc::new(|n: &dyn DomNode| n.url().map(AttributeValue::Text)),
        AttributeName::Options => {
            Arc::new(|n: &dyn DomNode| n.options().map(AttributeValue::List))
        }
        AttributeName::MaxScrolling => {
            Arc::new(|n: &dyn DomNode| n.max_scrolling().map(AttributeValue::numbers))
        }
        AttributeName::CurrentScrolling => {
            Arc::new(|n: &dyn DomNode| n.current_scrolling().map(AttributeValue::numbers))
        }
        AttributeName::Custom(_) => custom_accessor(name),
    }
}

fn custom_accessor(name: &AttributeName) -> Accessor {
    let key = name.to_string();
    Arc::new(move |n: &dyn DomNode| n.custom_attribute(&key))
}
