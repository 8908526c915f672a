use moxydoc_model::{
    filter_children, Access, Compound, CompoundKind, CompoundTree, FilterRules, Member, NodeId,
};
use pretty_assertions::assert_eq;

const MEMBER_KINDS: [&str; 4] = ["public-func", "protected-func", "private-attrib", "define"];
const ACCESS: [Access; 3] = [Access::Public, Access::Protected, Access::Private];

fn build_tree() -> CompoundTree {
    let mut tree = CompoundTree::new(
        Compound::index().with_member(Member::new("define", "VERSION", Access::Public)),
    );
    let root = tree.root();

    let kinds = [
        CompoundKind::Namespace,
        CompoundKind::Class,
        CompoundKind::Struct,
        CompoundKind::Union,
        CompoundKind::Group,
    ];

    let mut parents = vec![root];
    for idx in 0..24 {
        let parent = parents[(idx * 7) % parents.len()];
        let kind = kinds[idx % kinds.len()].clone();
        let mut compound = Compound::new(format!("c{idx}"), kind, format!("C{idx}"));
        for m in 0..(idx % 5) {
            let kind = MEMBER_KINDS[(idx + m) % MEMBER_KINDS.len()];
            let access = ACCESS[(idx * 3 + m) % ACCESS.len()];
            compound.push_member(Member::new(kind, format!("m{idx}_{m}"), access));
        }
        let node = tree.insert(parent, compound).expect("insert compound");
        parents.push(node);
    }
    tree
}

fn rule_sets() -> Vec<FilterRules> {
    vec![
        FilterRules::new(MEMBER_KINDS, ["namespace", "class", "struct"], Access::Private),
        FilterRules::new(["public-func"], ["namespace", "class"], Access::Public),
        FilterRules::new(["define", "private-attrib"], ["group", "union"], Access::Protected),
        FilterRules::new(Vec::<String>::new(), Vec::<String>::new(), Access::Private),
    ]
}

#[test]
fn filtering_never_grows_children_or_members() {
    let tree = build_tree();

    for rules in rule_sets() {
        let view = filter_children(&tree, tree.root(), &rules, None);
        for (id, compound) in tree.iter() {
            assert!(view.children(id).len() <= compound.compounds().len());
            assert!(view.member_indices(id).len() <= compound.members().len());
            for child in view.children(id) {
                assert!(compound.compounds().values().any(|original| original == child));
            }
        }
    }
}

#[test]
fn member_survives_iff_kind_and_access_pass() {
    let tree = build_tree();

    for rules in rule_sets() {
        let view = filter_children(&tree, tree.root(), &rules, None);
        let mut reached: Vec<NodeId> = vec![tree.root()];
        reached.extend(view.to_filtered_array(tree.root()));

        for id in reached {
            let survivors = view.member_indices(id);
            for (index, member) in tree[id].members().iter().enumerate() {
                let expected =
                    rules.members.contains(&member.kind) && member.access >= rules.access;
                assert_eq!(
                    survivors.contains(&index),
                    expected,
                    "member {} of {}",
                    member.name,
                    tree[id].id
                );
            }
        }
    }
}

#[test]
fn views_are_independent() {
    let tree = build_tree();
    let sets = rule_sets();

    let broad = filter_children(&tree, tree.root(), &sets[0], None);
    let before = broad.to_filtered_array(tree.root());
    let _narrow = filter_children(&tree, tree.root(), &sets[1], None);
    let again = filter_children(&tree, tree.root(), &sets[0], None);

    assert_eq!(before, again.to_filtered_array(tree.root()));
    assert_eq!(before, broad.to_filtered_array(tree.root()));
}

#[test]
fn namespace_with_class_renders_in_order() {
    let mut tree = CompoundTree::new(Compound::index());
    let root = tree.root();
    let ns = tree
        .insert(root, Compound::new("ns1", CompoundKind::Namespace, "ns1"))
        .unwrap();
    tree.insert(ns, Compound::new("ClassA", CompoundKind::Class, "ClassA"))
        .unwrap();

    let rules = FilterRules::new(Vec::<String>::new(), ["namespace", "class"], Access::Private);
    let view = filter_children(&tree, root, &rules, None);

    let mut order = vec![root];
    order.extend(view.to_filtered_array(root));
    let ids: Vec<_> = order.iter().map(|id| tree[*id].id.as_str()).collect();
    assert_eq!(ids, vec!["index", "ns1", "ClassA"]);
}

#[test]
fn filtered_members_follow_traversal_order() {
    let mut tree = CompoundTree::new(Compound::index());
    let root = tree.root();
    let outer = Compound::new("outer", CompoundKind::Class, "Outer")
        .with_member(Member::new("public-func", "first", Access::Public));
    let outer = tree.insert(root, outer).unwrap();
    let inner = Compound::new("inner", CompoundKind::Class, "Inner")
        .with_member(Member::new("public-func", "second", Access::Public))
        .with_member(Member::new("private-func", "hidden", Access::Private));
    tree.insert(outer, inner).unwrap();

    let rules = FilterRules::new(["public-func"], ["class"], Access::Private);
    let view = filter_children(&tree, root, &rules, None);

    let names: Vec<_> = view
        .filtered_members_array(root)
        .into_iter()
        .filter_map(|member| tree.member(member))
        .map(|member| member.name.as_str())
        .collect();
    assert_eq!(names, vec!["first", "second"]);
}
