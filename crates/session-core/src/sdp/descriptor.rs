//! MSRP media descriptors and the negotiated-descriptor derivation

use serde::{Deserialize, Serialize};

use crate::errors::{MediaSessionError, Result};
use crate::sdp::setup::SetupRole;

/// Attribute names the descriptor interprets itself
const SETUP_ATTR: &str = "setup";
const ACCEPT_TYPES_ATTR: &str = "accept-types";

/// The parts of an SDP `m=message` section this layer works with
///
/// Address and port come from the `c=`/`m=` lines, the rest from `a=`
/// attributes. Attributes other than `setup` and `accept-types` (such as
/// `path` or `accept-wrapped-types`) are carried through untouched and in
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    /// Host name or IP address
    pub address: String,
    pub port: u16,
    /// Accepted media types in preference order
    pub accept_types: Vec<String>,
    pub setup: SetupRole,
    /// Passthrough attributes as name/value pairs
    pub attributes: Vec<(String, String)>,
}

impl MediaDescriptor {
    pub fn new(address: impl Into<String>, port: u16, setup: SetupRole) -> Self {
        Self {
            address: address.into(),
            port,
            accept_types: Vec::new(),
            setup,
            attributes: Vec::new(),
        }
    }

    pub fn with_accept_type(mut self, media_type: impl Into<String>) -> Self {
        self.accept_types.push(media_type.into());
        self
    }

    pub fn with_accept_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accept_types.extend(types.into_iter().map(Into::into));
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Build a descriptor from the attribute list of a parsed media section.
    ///
    /// `setup` is required. `accept-types` is a space separated list; when it
    /// appears more than once the lists are concatenated.
    pub fn from_attributes<I, K, V>(address: impl Into<String>, port: u16, attrs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut setup = None;
        let mut accept_types = Vec::new();
        let mut attributes = Vec::new();

        for (name, value) in attrs {
            let (name, value) = (name.as_ref(), value.as_ref());
            if name.eq_ignore_ascii_case(SETUP_ATTR) {
                if setup.is_some() {
                    return Err(MediaSessionError::InvalidRole(format!("duplicate setup attribute '{}'", value)));
                }
                setup = Some(value.parse::<SetupRole>()?);
            } else if name.eq_ignore_ascii_case(ACCEPT_TYPES_ATTR) {
                accept_types.extend(value.split_whitespace().map(str::to_string));
            } else {
                attributes.push((name.to_string(), value.to_string()));
            }
        }

        let setup = setup.ok_or_else(|| MediaSessionError::InvalidRole("missing setup attribute".into()))?;
        Ok(Self {
            address: address.into(),
            port,
            accept_types,
            setup,
            attributes,
        })
    }

    /// Attributes for the SDP writer: `setup`, `accept-types`, then passthrough
    pub fn to_attributes(&self) -> Vec<(String, String)> {
        let mut attrs = Vec::with_capacity(self.attributes.len() + 2);
        attrs.push((SETUP_ATTR.to_string(), self.setup.to_string()));
        if !self.accept_types.is_empty() {
            attrs.push((ACCEPT_TYPES_ATTR.to_string(), self.accept_types.join(" ")));
        }
        attrs.extend(self.attributes.iter().cloned());
        attrs
    }

    /// First passthrough attribute with this name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether a message of `media_type` is acceptable
    pub fn accepts(&self, media_type: &str) -> bool {
        self.accept_types.iter().any(|pattern| type_covers(pattern, media_type))
    }

    /// Derive the negotiated descriptor once the local role is resolved.
    ///
    /// The address and port are those of the side that listens: the remote
    /// side when we connect, our own when we listen. A `holdconn` session
    /// keeps the remote address for a later re-offer.
    pub fn negotiate(local: &MediaDescriptor, remote: &MediaDescriptor, role: SetupRole) -> Result<MediaDescriptor> {
        let accept_types = intersect_accept_types(&local.accept_types, &remote.accept_types);
        if accept_types.is_empty() {
            return Err(MediaSessionError::NoCommonTypes);
        }

        let target = match role {
            SetupRole::Passive => local,
            SetupRole::Active | SetupRole::Holdconn | SetupRole::Actpass => remote,
        };

        Ok(MediaDescriptor {
            address: target.address.clone(),
            port: target.port,
            accept_types,
            setup: role,
            attributes: local.attributes.clone(),
        })
    }
}

fn is_wildcard(media_type: &str) -> bool {
    media_type == "*" || media_type.ends_with("/*")
}

/// Whether `pattern` (possibly `*` or `type/*`) matches `media_type`
fn type_covers(pattern: &str, media_type: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    if let Some(major) = pattern.strip_suffix("/*") {
        return media_type
            .split_once('/')
            .map(|(m, _)| m.eq_ignore_ascii_case(major))
            .unwrap_or(false);
    }
    pattern.eq_ignore_ascii_case(media_type)
}

/// Media types acceptable to both sides, in local preference order.
///
/// A concrete local type survives when some remote pattern covers it. A
/// local wildcard contributes the remote types it covers.
pub fn intersect_accept_types(local: &[String], remote: &[String]) -> Vec<String> {
    let mut common: Vec<String> = Vec::new();
    let mut push = |t: &str| {
        if !common.iter().any(|c| c.eq_ignore_ascii_case(t)) {
            common.push(t.to_string());
        }
    };

    for l in local {
        if remote.iter().any(|r| type_covers(r, l)) {
            push(l.as_str());
        } else if is_wildcard(l) {
            for r in remote.iter().filter(|r| type_covers(l, r)) {
                push(r.as_str());
            }
        }
    }
    common
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_attributes() {
        let desc = MediaDescriptor::from_attributes(
            "192.0.2.1",
            7394,
            [
                ("accept-types", "message/cpim text/plain"),
                ("path", "msrp://192.0.2.1:7394/abc;tcp"),
                ("SETUP", "ActPass"),
                ("accept-wrapped-types", "*"),
            ],
        )
        .unwrap();

        assert_eq!(desc.setup, SetupRole::Actpass);
        assert_eq!(desc.accept_types, types(&["message/cpim", "text/plain"]));
        assert_eq!(desc.attribute("path"), Some("msrp://192.0.2.1:7394/abc;tcp"));
        assert_eq!(desc.attributes.len(), 2);
        assert_eq!(desc.attributes[1].0, "accept-wrapped-types");
    }

    #[test]
    fn test_from_attributes_requires_valid_setup() {
        let missing = MediaDescriptor::from_attributes("h", 1, [("accept-types", "*")]);
        assert!(matches!(missing, Err(MediaSessionError::InvalidRole(_))));

        let bogus = MediaDescriptor::from_attributes("h", 1, [("setup", "sometimes")]);
        assert!(matches!(bogus, Err(MediaSessionError::InvalidRole(ref s)) if s == "sometimes"));

        let twice = MediaDescriptor::from_attributes("h", 1, [("setup", "active"), ("setup", "passive")]);
        assert!(matches!(twice, Err(MediaSessionError::InvalidRole(_))));
    }

    #[test]
    fn test_to_attributes_order() {
        let desc = MediaDescriptor::new("h", 2855, SetupRole::Passive)
            .with_accept_types(["text/plain", "message/cpim"])
            .with_attribute("path", "msrp://h:2855/s;tcp");
        assert_eq!(
            desc.to_attributes(),
            vec![
                ("setup".to_string(), "passive".to_string()),
                ("accept-types".to_string(), "text/plain message/cpim".to_string()),
                ("path".to_string(), "msrp://h:2855/s;tcp".to_string()),
            ]
        );
    }

    #[test]
    fn test_intersection_concrete() {
        let common = intersect_accept_types(
            &types(&["text/plain", "message/CPIM", "image/png"]),
            &types(&["message/cpim", "text/plain"]),
        );
        assert_eq!(common, types(&["text/plain", "message/CPIM"]));
    }

    #[test]
    fn test_intersection_wildcards() {
        assert_eq!(
            intersect_accept_types(&types(&["text/plain"]), &types(&["*"])),
            types(&["text/plain"])
        );
        assert_eq!(
            intersect_accept_types(&types(&["*"]), &types(&["text/plain", "image/jpeg"])),
            types(&["text/plain", "image/jpeg"])
        );
        assert_eq!(
            intersect_accept_types(&types(&["text/*", "image/png"]), &types(&["text/html", "image/*"])),
            types(&["text/html", "image/png"])
        );
        assert_eq!(intersect_accept_types(&types(&["*"]), &types(&["*"])), types(&["*"]));
        assert!(intersect_accept_types(&types(&["text/plain"]), &types(&["image/*"])).is_empty());
        assert!(intersect_accept_types(&[], &types(&["*"])).is_empty());
    }

    #[test]
    fn test_accepts() {
        let desc = MediaDescriptor::new("h", 1, SetupRole::Active).with_accept_types(["text/*", "message/cpim"]);
        assert!(desc.accepts("text/plain"));
        assert!(desc.accepts("Message/CPIM"));
        assert!(!desc.accepts("image/png"));
    }

    #[test]
    fn test_negotiate_takes_passive_side_address() {
        let local = MediaDescriptor::new("10.0.0.1", 2855, SetupRole::Actpass)
            .with_accept_type("text/plain")
            .with_attribute("path", "msrp://10.0.0.1:2855/l;tcp");
        let remote = MediaDescriptor::new("10.0.0.2", 7000, SetupRole::Passive).with_accept_type("*");

        let active = MediaDescriptor::negotiate(&local, &remote, SetupRole::Active).unwrap();
        assert_eq!((active.address.as_str(), active.port), ("10.0.0.2", 7000));
        assert_eq!(active.setup, SetupRole::Active);
        assert_eq!(active.accept_types, types(&["text/plain"]));
        assert_eq!(active.attribute("path"), Some("msrp://10.0.0.1:2855/l;tcp"));

        let passive = MediaDescriptor::negotiate(&local, &remote, SetupRole::Passive).unwrap();
        assert_eq!((passive.address.as_str(), passive.port), ("10.0.0.1", 2855));
    }

    #[test]
    fn test_negotiate_no_common_types() {
        let local = MediaDescriptor::new("a", 1, SetupRole::Active).with_accept_type("text/plain");
        let remote = MediaDescriptor::new("b", 2, SetupRole::Passive).with_accept_type("image/png");
        assert!(matches!(
            MediaDescriptor::negotiate(&local, &remote, SetupRole::Active),
            Err(MediaSessionError::NoCommonTypes)
        ));
    }
}
