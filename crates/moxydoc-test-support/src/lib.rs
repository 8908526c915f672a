//! Shared test harness utilities for moxydoc crates.

use std::fs;
use std::path::Path;

use moxydoc_config::Config;
use moxydoc_model::{Access, Compound, CompoundKind, CompoundTree, Member};
use tempfile::TempDir;

/// Doxygen XML output for a small geometry library, as `(file name, contents)`.
pub const DOXYGEN_FIXTURE: &[(&str, &str)] = &[
    ("index.xml", include_str!("../fixtures/doxygen/index.xml")),
    ("namespacegeo.xml", include_str!("../fixtures/doxygen/namespacegeo.xml")),
    (
        "classgeo_1_1Shape.xml",
        include_str!("../fixtures/doxygen/classgeo_1_1Shape.xml"),
    ),
    (
        "classgeo_1_1Circle.xml",
        include_str!("../fixtures/doxygen/classgeo_1_1Circle.xml"),
    ),
    (
        "structgeo_1_1Point.xml",
        include_str!("../fixtures/doxygen/structgeo_1_1Point.xml"),
    ),
    ("group__shapes.xml", include_str!("../fixtures/doxygen/group__shapes.xml")),
    ("intro.xml", include_str!("../fixtures/doxygen/intro.xml")),
    ("geo_8h.xml", include_str!("../fixtures/doxygen/geo_8h.xml")),
];

/// Returns a baseline configuration for tests, rooted at `base_dir`.
pub fn test_config(base_dir: impl AsRef<Path>) -> Config {
    Config::defaults(base_dir.as_ref())
}

/// Copy [`DOXYGEN_FIXTURE`] into `dir`.
pub fn write_doxygen_fixture(dir: impl AsRef<Path>) {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).expect("create fixture dir");
    for (name, contents) in DOXYGEN_FIXTURE {
        fs::write(dir.join(name), contents).expect("write fixture file");
    }
}

/// Temporary directory holding [`DOXYGEN_FIXTURE`] under `xml/`.
pub fn doxygen_fixture() -> TempDir {
    let temp = TempDir::new().expect("tempdir");
    write_doxygen_fixture(temp.path().join("xml"));
    temp
}

/// In-memory tree shaped like the Doxygen fixture:
///
/// ```text
/// index
/// ├── geo (namespace)
/// │   ├── geo::Shape (class)
/// │   ├── geo::Circle (class)
/// │   │   └── geo::Circle::Arc (class)
/// │   └── geo::Point (struct)
/// ├── shapes (group, links Shape and Circle)
/// └── intro (page)
/// ```
pub fn sample_tree() -> CompoundTree {
    let mut tree = CompoundTree::new(Compound::index());
    let root = tree.root();

    let geo = Compound::new("namespacegeo", CompoundKind::Namespace, "geo")
        .with_brief("Geometry primitives.")
        .with_member(
            Member::new("func", "distance", Access::Public)
                .with_id("namespacegeo_1a4f2d")
                .with_prototype("double geo::distance(const Point &a, const Point &b)")
                .with_brief("Distance between two points."),
        );
    let geo = tree.insert(root, geo).expect("insert geo");

    let shape = Compound::new("classgeo_1_1Shape", CompoundKind::Class, "Shape")
        .with_fullname("geo::Shape")
        .with_brief("Base class of every shape.")
        .with_member(
            Member::new("public-func", "area", Access::Public)
                .with_id("classgeo_1_1Shape_1a01")
                .with_prototype("public virtual double geo::Shape::area() const =0")
                .with_brief("Surface covered by the shape."),
        )
        .with_member(
            Member::new("protected-attrib", "label_", Access::Protected)
                .with_id("classgeo_1_1Shape_1a02"),
        )
        .with_member(
            Member::new("private-func", "invalidate", Access::Private)
                .with_id("classgeo_1_1Shape_1a03"),
        );
    let shape = tree.insert(geo, shape).expect("insert Shape");

    let circle = Compound::new("classgeo_1_1Circle", CompoundKind::Class, "Circle")
        .with_fullname("geo::Circle")
        .with_brief("A round shape.")
        .with_member(
            Member::new("public-func", "area", Access::Public)
                .with_id("classgeo_1_1Circle_1a01")
                .with_prototype("double geo::Circle::area() const override")
                .with_brief("Area of the circle."),
        );
    let circle = tree.insert(geo, circle).expect("insert Circle");

    let arc = Compound::new("classgeo_1_1Circle_1_1Arc", CompoundKind::Class, "Arc")
        .with_fullname("geo::Circle::Arc")
        .with_brief("Part of a circle.");
    tree.insert(circle, arc).expect("insert Arc");

    let point = Compound::new("structgeo_1_1Point", CompoundKind::Struct, "Point")
        .with_fullname("geo::Point")
        .with_brief("A point in the plane.")
        .with_member(
            Member::new("public-attrib", "x", Access::Public).with_id("structgeo_1_1Point_1a01"),
        );
    tree.insert(geo, point).expect("insert Point");

    let group = Compound::new("group__shapes", CompoundKind::Group, "shapes")
        .with_title("Shape types")
        .with_brief("Everything that has an area.");
    let group = tree.insert(root, group).expect("insert group");
    tree.link(group, shape).expect("link Shape");
    tree.link(group, circle).expect("link Circle");

    let page = Compound::new("intro", CompoundKind::Page, "intro")
        .with_title("Introduction")
        .with_brief("How to use the library.");
    tree.insert(root, page).expect("insert page");

    tree
}
