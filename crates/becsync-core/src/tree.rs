// ── BECS object tree ──
//
// In-memory arena over the BECS object set: an oid -> object map plus a
// parentoid -> children index, both built in one pass from a tree-find
// response. Upward walks (opaque resolution, parent search) are
// iterative and bounded; a lookup miss falls through to a single-object
// API fetch so partial trees still resolve.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{debug, warn};

use becsync_api::becs::{BecsObject, ROOT_OID};
use becsync_api::BecsClient;

use crate::error::CoreError;
use crate::model::{DesiredAddress, DesiredInterface};

/// Upward walks give up after this many hops. The tree is a few levels
/// deep in practice; hitting the bound means a parentoid cycle.
const MAX_WALK: usize = 64;

pub struct SourceTree {
    client: BecsClient,
    objects: HashMap<i64, BecsObject>,
    children: HashMap<i64, Vec<i64>>,
}

impl SourceTree {
    pub fn new(client: BecsClient) -> Self {
        Self {
            client,
            objects: HashMap::new(),
            children: HashMap::new(),
        }
    }

    pub fn client(&self) -> &BecsClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut BecsClient {
        &mut self.client
    }

    /// Replace the indexed object set with `objects`.
    pub fn load(&mut self, objects: Vec<BecsObject>) {
        self.objects.clear();
        self.children.clear();
        for obj in objects {
            self.children.entry(obj.parentoid).or_default().push(obj.oid);
            self.objects.insert(obj.oid, obj);
        }
        debug!(objects = self.objects.len(), "source tree indexed");
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Indexed object, no network.
    pub fn cached(&self, oid: i64) -> Option<&BecsObject> {
        self.objects.get(&oid)
    }

    /// Oids indexed under `parentoid`.
    pub fn children_of(&self, parentoid: i64) -> &[i64] {
        self.children.get(&parentoid).map_or(&[], Vec::as_slice)
    }

    /// Iterate all indexed objects.
    pub fn iter(&self) -> impl Iterator<Item = &BecsObject> {
        self.objects.values()
    }

    /// Collect descendants of `oid`, at most `walkdown` levels deep,
    /// from the local index. With a class mask a descendant is kept
    /// only when its parent's class is in the mask; the walk still
    /// descends through non-matching parents.
    pub fn tree_find(
        &self,
        oid: i64,
        walkdown: usize,
        classmask: Option<&[&str]>,
    ) -> Vec<&BecsObject> {
        let mut out = Vec::new();
        let mut frontier = vec![oid];
        for _ in 0..walkdown {
            let mut next = Vec::new();
            for parent in frontier {
                let parent_matches = classmask.is_none_or(|mask| {
                    self.cached(parent)
                        .is_some_and(|p| mask.contains(&p.class.as_str()))
                });
                for &child in self.children_of(parent) {
                    if let Some(obj) = self.cached(child) {
                        if parent_matches {
                            out.push(obj);
                        }
                        next.push(child);
                    }
                }
            }
            frontier = next;
        }
        out
    }

    /// Indexed object, falling back to an `object_find` call on a miss.
    /// The fetched object joins the index.
    pub async fn fetch(&mut self, oid: i64) -> Result<Option<&BecsObject>, CoreError> {
        if !self.objects.contains_key(&oid) {
            match self.client.object_find(oid).await? {
                Some(obj) => {
                    self.children.entry(obj.parentoid).or_default().push(obj.oid);
                    self.objects.insert(oid, obj);
                }
                None => return Ok(None),
            }
        }
        Ok(self.objects.get(&oid))
    }

    // ── Upward walks ─────────────────────────────────────────────────

    /// Resolve an inheritable opaque attribute: the first value named
    /// `name` found on `oid` or any of its ancestors.
    pub async fn search_opaque(
        &mut self,
        oid: i64,
        name: &str,
    ) -> Result<Option<String>, CoreError> {
        let mut current = oid;
        for _ in 0..MAX_WALK {
            let Some(obj) = self.fetch(current).await? else {
                return Ok(None);
            };
            if let Some(value) = obj.first_opaque(name) {
                return Ok(Some(value.to_owned()));
            }
            if obj.parentoid <= ROOT_OID {
                return Ok(None);
            }
            current = obj.parentoid;
        }
        warn!(oid, name, "opaque walk exceeded depth bound");
        Ok(None)
    }

    /// Find the upstream device(s) for the element at `oid`.
    ///
    /// Walks upward; at each node an explicit `parents` opaque wins, and
    /// from the first ancestor on an enclosing `element-attach` answers
    /// with its own name. Returns a comma-separated name list.
    pub async fn search_parent(&mut self, oid: i64) -> Result<Option<String>, CoreError> {
        let mut current = oid;
        let mut check_element = false;
        for _ in 0..MAX_WALK {
            let Some(obj) = self.fetch(current).await? else {
                return Ok(None);
            };
            if let Some(parents) = obj.first_opaque("parents") {
                return Ok(Some(parents.to_owned()));
            }
            if check_element && obj.class == "element-attach" {
                return Ok(Some(obj.name.clone()));
            }
            if obj.parentoid <= ROOT_OID {
                return Ok(None);
            }
            current = obj.parentoid;
            check_element = true;
        }
        warn!(oid, "parent walk exceeded depth bound");
        Ok(None)
    }

    // ── Interface extraction ─────────────────────────────────────────

    /// Collect the desired interfaces of the element at `oid`, keyed by
    /// interface name, each with its v4/v6 addresses.
    pub async fn interfaces(
        &mut self,
        oid: i64,
    ) -> Result<IndexMap<String, DesiredInterface>, CoreError> {
        let mut out = IndexMap::new();

        let iface_oids: Vec<i64> = self
            .tree_find(oid, 2, None)
            .into_iter()
            .filter(|obj| obj.class == "interface")
            .map(|obj| obj.oid)
            .collect();

        for iface_oid in iface_oids {
            let Some(iface) = self.cached(iface_oid) else {
                continue;
            };
            let name = iface.name.clone();
            let mut desired = DesiredInterface {
                oid: iface_oid,
                name: name.clone(),
                role: iface.role.clone(),
                enabled: !iface.has_flag("disable"),
                prefix4: Vec::new(),
                prefix6: Vec::new(),
            };

            let resource_oids: Vec<i64> = self
                .tree_find(iface_oid, 1, Some(&["interface"]))
                .into_iter()
                .filter(|obj| obj.class == "resource-inet")
                .map(|obj| obj.oid)
                .collect();

            for res_oid in resource_oids {
                let Some(address) = self.resolve_address(res_oid).await? else {
                    continue;
                };
                if address.address.contains(':') {
                    desired.prefix6.push(address);
                } else {
                    desired.prefix4.push(address);
                }
            }

            out.insert(name, desired);
        }
        Ok(out)
    }

    /// Render a resource-inet object as `address/prefixlen`. With the
    /// `useparentmask` flag the prefix length is taken from the parent
    /// resource one hop away.
    async fn resolve_address(&mut self, oid: i64) -> Result<Option<DesiredAddress>, CoreError> {
        let Some(obj) = self.fetch(oid).await? else {
            return Ok(None);
        };
        let Some(resource) = obj.resource.clone() else {
            return Ok(None);
        };

        let mut prefixlen = resource.prefixlen;
        if obj.has_flag("useparentmask") {
            if let Some(rcparent) = resource.rcparentoid {
                if let Some(parent) = self.fetch(rcparent).await? {
                    if let Some(parent_res) = &parent.resource {
                        prefixlen = parent_res.prefixlen;
                    }
                }
            }
        }

        Ok(Some(DesiredAddress {
            oid,
            address: format!("{}/{prefixlen}", resource.address),
        }))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use becsync_api::becs::{InetResource, NamedValues};
    use becsync_api::TransportConfig;
    use url::Url;

    fn obj(oid: i64, class: &str, name: &str, parentoid: i64) -> BecsObject {
        BecsObject {
            oid,
            class: class.into(),
            name: name.into(),
            parentoid,
            elementtype: None,
            role: None,
            flags: None,
            opaque: Vec::new(),
            parameters: Vec::new(),
            resource: None,
        }
    }

    fn opaque(name: &str, value: &str) -> NamedValues {
        NamedValues {
            name: name.into(),
            values: vec![value.into()],
        }
    }

    // All walks in these tests stay within the preloaded index, so the
    // client never sends a request.
    fn tree(objects: Vec<BecsObject>) -> SourceTree {
        let client = BecsClient::new(
            Url::parse("http://becs.invalid").unwrap(),
            &TransportConfig::default(),
        )
        .unwrap();
        let mut tree = SourceTree::new(client);
        tree.load(objects);
        tree
    }

    #[test]
    fn tree_find_bounds_depth_and_filters_on_parent_class() {
        let element = obj(30, "element-attach", "sw1", ROOT_OID);
        let iface = obj(40, "interface", "ethernet1", 30);
        let res = obj(50, "resource-inet", "", 40);
        let deep = obj(60, "resource-inet", "", 50);
        let tree = tree(vec![element, iface, res, deep]);

        let depth1: Vec<i64> = tree.tree_find(30, 1, None).iter().map(|o| o.oid).collect();
        assert_eq!(depth1, vec![40]);

        let depth2: Vec<i64> = tree.tree_find(30, 2, None).iter().map(|o| o.oid).collect();
        assert_eq!(depth2, vec![40, 50]);

        // The mask is on the parent's class, not the descendant's own.
        let masked: Vec<i64> = tree
            .tree_find(30, 3, Some(&["interface"]))
            .iter()
            .map(|o| o.oid)
            .collect();
        assert_eq!(masked, vec![50]);
    }

    #[tokio::test]
    async fn interfaces_are_found_two_levels_down() {
        let element = obj(30, "element-attach", "sw1", ROOT_OID);
        let group = obj(35, "interface-group", "uplinks", 30);
        let iface = obj(40, "interface", "ethernet9", 35);
        let mut tree = tree(vec![element, group, iface]);

        let interfaces = tree.interfaces(30).await.unwrap();
        assert!(interfaces.contains_key("ethernet9"));
    }

    #[tokio::test]
    async fn search_opaque_walks_ancestors() {
        let mut region = obj(10, "region", "north", ROOT_OID);
        region.opaque.push(opaque("alarm_destination", "noc@example.com"));
        let site = obj(20, "site", "pop1", 10);
        let element = obj(30, "element-attach", "sw1", 20);
        let mut tree = tree(vec![region, site, element]);

        assert_eq!(
            tree.search_opaque(30, "alarm_destination").await.unwrap(),
            Some("noc@example.com".to_owned())
        );
        assert_eq!(tree.search_opaque(30, "alarm_timeperiod").await.unwrap(), None);
    }

    #[tokio::test]
    async fn search_parent_prefers_opaque_over_enclosing_element() {
        let root_area = obj(10, "area", "core", ROOT_OID);
        let mut enclosing = obj(20, "element-attach", "dist1", 10);
        enclosing.opaque.push(opaque("parents", "agg1,agg2"));
        let element = obj(30, "element-attach", "sw1", 20);
        let mut tree = tree(vec![root_area, enclosing, element]);

        // The opaque on the enclosing element wins over its name.
        assert_eq!(
            tree.search_parent(30).await.unwrap(),
            Some("agg1,agg2".to_owned())
        );
    }

    #[tokio::test]
    async fn search_parent_falls_back_to_enclosing_element_name() {
        let area = obj(10, "area", "core", ROOT_OID);
        let enclosing = obj(20, "element-attach", "dist1", 10);
        let element = obj(30, "element-attach", "sw1", 20);
        let mut tree = tree(vec![area, enclosing, element]);

        // The element itself is skipped; the enclosing one answers.
        assert_eq!(tree.search_parent(30).await.unwrap(), Some("dist1".to_owned()));
    }

    #[tokio::test]
    async fn search_parent_honors_opaque_on_the_element_itself() {
        let mut element = obj(30, "element-attach", "sw1", ROOT_OID);
        element.opaque.push(opaque("parents", "dist9"));
        let mut tree = tree(vec![element]);

        // An explicit parents opaque on the element itself is honored.
        assert_eq!(tree.search_parent(30).await.unwrap(), Some("dist9".to_owned()));
    }

    #[tokio::test]
    async fn interfaces_collects_addresses_and_flags() {
        let element = obj(30, "element-attach", "sw1", ROOT_OID);
        let loopback = obj(40, "interface", "loopback0", 30);
        let mut eth = obj(41, "interface", "ethernet1", 30);
        eth.flags = Some("disable".into());

        let mut lo_addr = obj(50, "resource-inet", "", 40);
        lo_addr.resource = Some(InetResource {
            address: "10.0.0.1".into(),
            prefixlen: 32,
            rcparentoid: None,
        });
        let mut lo_addr6 = obj(51, "resource-inet", "", 40);
        lo_addr6.resource = Some(InetResource {
            address: "2001:db8::1".into(),
            prefixlen: 128,
            rcparentoid: None,
        });

        let mut eth_net = obj(60, "resource-inet", "", ROOT_OID);
        eth_net.resource = Some(InetResource {
            address: "192.0.2.0".into(),
            prefixlen: 24,
            rcparentoid: None,
        });
        let mut eth_addr = obj(61, "resource-inet", "", 41);
        eth_addr.flags = Some("useparentmask".into());
        eth_addr.resource = Some(InetResource {
            address: "192.0.2.7".into(),
            prefixlen: 32,
            rcparentoid: Some(60),
        });

        let mut tree = tree(vec![element, loopback, eth, lo_addr, lo_addr6, eth_net, eth_addr]);
        let interfaces = tree.interfaces(30).await.unwrap();
        assert_eq!(interfaces.len(), 2);

        let lo = &interfaces["loopback0"];
        assert!(lo.enabled);
        assert_eq!(lo.prefix4, vec![DesiredAddress { oid: 50, address: "10.0.0.1/32".into() }]);
        assert_eq!(lo.prefix6, vec![DesiredAddress { oid: 51, address: "2001:db8::1/128".into() }]);

        let eth = &interfaces["ethernet1"];
        assert!(!eth.enabled);
        // Prefix length inherited from the parent network resource.
        assert_eq!(eth.prefix4, vec![DesiredAddress { oid: 61, address: "192.0.2.7/24".into() }]);
    }
}
