//! Bus → rule → target graph.

use eventaudit_core::{Edge, EventBus, Node, NodeKind, Rule, TopologyGraph};
use std::collections::{HashMap, HashSet};

fn bus_id(name: &str) -> String {
    format!("bus_{name}")
}

/// Short label for a target: the final `:` segment of its ARN
fn target_label(arn: &str) -> &str {
    arn.rsplit(':').next().unwrap_or(arn)
}

fn duplicated<'a, I: IntoIterator<Item = &'a str>>(keys: I) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    keys.into_iter().filter(|k| !seen.insert(*k)).collect()
}

/// Build the topology graph.
///
/// Rule and target ids are plain (`rule_<name>`, `target_<id>`) unless the
/// plain id would collide, in which case they are qualified with their
/// parent (`rule_<bus>/<name>`, `target_<rule>/<id>`). Nodes and edges
/// follow inventory order.
pub fn build_topology(buses: &[EventBus], rules: &[Rule]) -> TopologyGraph {
    let mut graph = TopologyGraph::default();

    let mut bus_ids = HashMap::with_capacity(buses.len());
    for bus in buses {
        let id = bus_id(&bus.name);
        bus_ids.insert(bus.name.as_str(), id.clone());
        graph.nodes.push(Node {
            id,
            kind: NodeKind::Bus,
            label: bus.name.clone(),
            issue_count: bus.issues.len(),
        });
    }

    let shared_rule_names = duplicated(rules.iter().map(|r| r.name.as_str()));
    let shared_target_ids = duplicated(
        rules
            .iter()
            .flat_map(|r| r.targets.iter().map(|t| t.id.as_str())),
    );

    for rule in rules {
        let rule_key = if shared_rule_names.contains(rule.name.as_str()) {
            format!("{}/{}", rule.event_bus_name, rule.name)
        } else {
            rule.name.clone()
        };
        let rule_id = format!("rule_{rule_key}");

        graph.nodes.push(Node {
            id: rule_id.clone(),
            kind: NodeKind::Rule,
            label: rule.name.clone(),
            issue_count: rule.issues.len(),
        });

        if let Some(parent) = bus_ids.get(rule.event_bus_name.as_str()) {
            graph.links.push(Edge {
                source: parent.clone(),
                target: rule_id.clone(),
            });
        }

        for target in &rule.targets {
            let target_id = if shared_target_ids.contains(target.id.as_str()) {
                format!("target_{rule_key}/{}", target.id)
            } else {
                format!("target_{}", target.id)
            };

            graph.nodes.push(Node {
                id: target_id.clone(),
                kind: NodeKind::Target,
                label: target_label(&target.arn).to_string(),
                issue_count: target.issues.len(),
            });
            graph.links.push(Edge {
                source: rule_id.clone(),
                target: target_id,
            });
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{rule, target};
    use eventaudit_core::{Issue, IssueKind, Tags};

    fn bus(name: &str) -> EventBus {
        EventBus {
            name: name.into(),
            arn: format!("arn:aws:events:us-east-1:123456789012:event-bus/{name}"),
            has_resource_policy: true,
            archives: Vec::new(),
            tags: Tags::new(),
            issues: Vec::new(),
        }
    }

    #[test]
    fn one_node_per_entity_and_one_edge_per_parent() {
        let mut orders = rule("app-bus", "orders");
        orders.targets = vec![
            target("queue", "arn:aws:sqs:us-east-1:123456789012:orders.fifo"),
            target("fn", "arn:aws:lambda:us-east-1:123456789012:function:handler"),
        ];
        let nightly = rule("default", "nightly");

        let graph = build_topology(&[bus("default"), bus("app-bus")], &[orders, nightly]);

        assert_eq!(graph.nodes.len(), 6);
        assert_eq!(graph.links.len(), 4);
        assert_eq!(graph.out_degree("bus_app-bus"), 1);
        assert_eq!(graph.out_degree("rule_orders"), 2);
        assert_eq!(graph.node("target_queue").unwrap().label, "orders.fifo");
        assert_eq!(graph.node("target_fn").unwrap().label, "handler");
        assert_eq!(
            graph.links.iter().filter(|e| e.target == "rule_nightly").count(),
            1
        );
    }

    #[test]
    fn colliding_ids_are_qualified() {
        let mut a = rule("default", "sync");
        a.targets = vec![target("Id1", "arn:aws:sns:us-east-1:123456789012:a")];
        let mut b = rule("app-bus", "sync");
        b.targets = vec![target("Id1", "arn:aws:sns:us-east-1:123456789012:b")];

        let graph = build_topology(&[bus("default"), bus("app-bus")], &[a, b]);

        let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids.len(), graph.nodes.len());
        assert!(ids.contains("rule_default/sync"));
        assert!(ids.contains("rule_app-bus/sync"));
        assert!(ids.contains("target_app-bus/sync/Id1"));
        assert_eq!(graph.out_degree("bus_default"), 1);
    }

    #[test]
    fn issue_counts_are_not_rolled_up() {
        let mut r = rule("default", "nightly");
        r.issues.push(Issue::new(IssueKind::RuleInactive, "idle"));
        let mut t = target("fn", "arn:aws:lambda:us-east-1:123456789012:function:f");
        t.issues.push(Issue::new(IssueKind::LambdaThrottling, "reserved 1"));
        t.issues.push(Issue::new(IssueKind::NoCustomRetryPolicy, "defaults"));
        r.targets.push(t);

        let graph = build_topology(&[bus("default")], &[r]);
        assert_eq!(graph.node("bus_default").unwrap().issue_count, 0);
        assert_eq!(graph.node("rule_nightly").unwrap().issue_count, 1);
        assert_eq!(graph.node("target_fn").unwrap().issue_count, 2);
    }

    #[test]
    fn orphan_rules_have_no_bus_edge() {
        let graph = build_topology(&[], &[rule("gone", "stray")]);
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.links.is_empty());
    }
}
