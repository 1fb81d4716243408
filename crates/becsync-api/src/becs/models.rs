// BECS ExtAPI object model
//
// Every BECS entity is a node in one object tree. Nodes carry a class
// (`element-attach`, `interface`, `resource-inet`, ...), an upward
// `parentoid` pointer, and two loosely-typed attribute bags: `opaque`
// (inheritable annotations, resolved by walking ancestors) and
// `parameters` (local settings). Only a small well-known attribute set
// is ever populated; accessors below cover it.

use serde::{Deserialize, Serialize};

/// Oid of the tree root sentinel. An object whose `parentoid` equals
/// this value is a top-level node; upward walks stop here.
pub const ROOT_OID: i64 = 1;

/// A named attribute with zero or more values, as used by both the
/// `opaque` and `parameters` bags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedValues {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// IP resource payload attached to `resource-inet` objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InetResource {
    pub address: String,
    pub prefixlen: u8,
    /// Oid of the parent resource, used when the `useparentmask` flag
    /// says the prefix length is inherited.
    #[serde(default)]
    pub rcparentoid: Option<i64>,
}

/// One object in the BECS tree, as returned by `object_find`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BecsObject {
    pub oid: i64,
    pub class: String,
    #[serde(default)]
    pub name: String,
    pub parentoid: i64,
    #[serde(default)]
    pub elementtype: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// Free-form flag string, a set of dash-separated tokens
    /// (e.g. `"disable-useparentmask"`).
    #[serde(default)]
    pub flags: Option<String>,
    #[serde(default)]
    pub opaque: Vec<NamedValues>,
    #[serde(default)]
    pub parameters: Vec<NamedValues>,
    #[serde(default)]
    pub resource: Option<InetResource>,
}

impl BecsObject {
    /// True if the flag string contains `token` as a whole token.
    ///
    /// Tokens are separated by dashes (commas and spaces are tolerated);
    /// substring matches do not count.
    pub fn has_flag(&self, token: &str) -> bool {
        self.flags
            .as_deref()
            .is_some_and(|f| f.split(['-', ',', ' ']).any(|t| t == token))
    }

    /// First value of the first opaque attribute named `name`, if any.
    pub fn first_opaque(&self, name: &str) -> Option<&str> {
        self.opaque
            .iter()
            .find(|o| o.name == name)
            .and_then(|o| o.values.first())
            .map(String::as_str)
    }

    /// First value of the first parameter named `name`, if any.
    pub fn first_parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.values.first())
            .map(String::as_str)
    }
}
