//! Shadow tree / engine agreement under arbitrary mutation sequences.

use proptest::prelude::*;
use spark_yoga::engine::native;
use spark_yoga::{Error, Node};

#[derive(Debug, Clone)]
enum Op {
    Insert { parent: usize, child: usize, index: usize },
    Remove { parent: usize, child: usize },
}

fn op(nodes: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..nodes, 0..nodes, 0..nodes + 1)
            .prop_map(|(parent, child, index)| Op::Insert { parent, child, index }),
        (0..nodes, 0..nodes).prop_map(|(parent, child)| Op::Remove { parent, child }),
    ]
}

/// Every managed child list equals the engine's, and every parent link
/// matches exactly one child slot.
fn assert_trees_agree(nodes: &[Node]) -> Result<(), TestCaseError> {
    for node in nodes {
        let managed: Vec<u64> = node
            .children()
            .iter()
            .map(|child| child.native_ref().unwrap().address())
            .collect();
        let engine: Vec<u64> = native::node_get_children(node.native_ref().unwrap())
            .unwrap()
            .iter()
            .map(|child| child.address())
            .collect();
        prop_assert_eq!(managed, engine);

        for index in 0..node.child_count() {
            let child = node.get_child(index).unwrap().unwrap();
            prop_assert_eq!(child.get_parent().unwrap(), Some(node.clone()));
        }

        let holders = nodes
            .iter()
            .flat_map(|other| other.children())
            .filter(|child| child == node)
            .count();
        match node.get_parent().unwrap() {
            Some(parent) => {
                prop_assert_eq!(holders, 1);
                prop_assert!(parent.children().contains(node));
            }
            None => prop_assert_eq!(holders, 0),
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn test_random_mutations_keep_trees_in_lockstep(ops in prop::collection::vec(op(6), 0..40)) {
        let nodes: Vec<Node> = (0..6).map(|_| Node::new().unwrap()).collect();

        for op in ops {
            match op {
                Op::Insert { parent, child, index } => {
                    let before = nodes[parent].children();
                    let result = nodes[parent].insert_child(&nodes[child], index);
                    if result.is_err() {
                        // failed inserts change nothing
                        prop_assert_eq!(nodes[parent].children(), before);
                    }
                }
                Op::Remove { parent, child } => {
                    nodes[parent].remove_child(&nodes[child]).unwrap();
                }
            }
            assert_trees_agree(&nodes)?;
        }
    }

    #[test]
    fn test_dropping_everything_releases_everything(ops in prop::collection::vec(op(5), 0..30)) {
        let before = native::node_instance_count();
        {
            let nodes: Vec<Node> = (0..5).map(|_| Node::new().unwrap()).collect();
            for op in ops {
                if let Op::Insert { parent, child, index } = op {
                    let _ = nodes[parent].insert_child(&nodes[child], index);
                }
            }
            prop_assert_eq!(native::node_instance_count(), before + 5);
        }
        prop_assert_eq!(native::node_instance_count(), before);
    }
}

#[test]
fn test_structural_errors_leave_engine_untouched() {
    let a = Node::new().unwrap();
    let b = Node::new().unwrap();
    let child = Node::new().unwrap();
    a.insert_child(&child, 0).unwrap();

    assert!(matches!(b.insert_child(&child, 0), Err(Error::ChildAlreadyParented)));
    assert_eq!(native::node_get_child_count(b.native_ref().unwrap()).unwrap(), 0);
    assert_eq!(
        native::node_get_parent(child.native_ref().unwrap()).unwrap(),
        Some(a.native_ref().unwrap())
    );
}

#[test]
fn test_reset_leaves_siblings_alone() {
    let root = Node::new().unwrap();
    let sibling = Node::new().unwrap();
    sibling.set_width(40.0).unwrap();
    root.insert_child(&sibling, 0).unwrap();

    let loose = Node::new().unwrap();
    loose.set_width(80.0).unwrap();
    loose.set_measure_function(|_, _, _, _, _| spark_yoga::Size::ZERO).unwrap();
    loose.reset().unwrap();

    assert_eq!(loose.width().unwrap(), spark_yoga::Value::Auto);
    assert!(!loose.has_measure_function());
    assert_eq!(sibling.width().unwrap(), spark_yoga::Value::Point(40.0));
    assert_eq!(root.child_count(), 1);
}
