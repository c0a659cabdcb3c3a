//! Placement scenarios for common project layouts.

mod common;

use std::path::PathBuf;

use common::{Project, output_of, packages_of};
use minipack_graph::NodeKind;
use serde_json::json;

#[test]
fn main_package_component_keeps_natural_path() {
    let project = Project::new();
    project
        .app(json!({ "pages": ["pages/index/index"] }))
        .entry("pages/index/index", &[("btn", "/components/btn/btn")])
        .entry("components/btn/btn", &[]);

    let graph = project.built();

    let page = graph.node_by_relative_path("pages/index/index.js").unwrap();
    assert_eq!(page.kind(), NodeKind::Page);
    let btn = graph.node_by_relative_path("components/btn/btn.js").unwrap();
    assert_eq!(btn.kind(), NodeKind::Component);

    assert_eq!(packages_of(&graph, "pages/index/index.js"), vec!["app"]);
    assert_eq!(packages_of(&graph, "components/btn/btn.js"), vec!["app"]);
    assert_eq!(
        output_of(&graph, "components/btn/btn.js", "app"),
        PathBuf::from("components/btn/btn.js")
    );

    let chunk = &graph.chunks()["components/btn/btn"];
    assert_eq!(chunk.group, "app");
    assert!(!chunk.independent);
}

#[test]
fn companions_are_entry_assets() {
    let project = Project::new();
    project
        .app(json!({ "pages": ["pages/index/index"] }))
        .entry("pages/index/index", &[])
        .write("pages/index/index.less", "")
        .write("pages/index/other.wxss", "");

    let graph = project.built();

    let assets: Vec<PathBuf> = graph
        .dependencies(&project.path("pages/index/index.js"))
        .into_iter()
        .map(|node| {
            assert_eq!(node.kind(), NodeKind::EntryAsset);
            common::relative_to(&project.root, node.path())
        })
        .collect();
    assert_eq!(
        assets,
        vec![
            PathBuf::from("pages/index/index.less"),
            PathBuf::from("pages/index/index.wxml"),
            PathBuf::from("pages/index/index.wxss"),
        ]
    );
    assert!(graph.node_by_relative_path("pages/index/other.wxss").is_none());
}

#[test]
fn single_sub_package_consumer_gets_a_copy() {
    let project = Project::new();
    project
        .app(json!({
            "pages": [],
            "subpackages": [{ "root": "pkgA", "pages": ["list"] }]
        }))
        .entry("pkgA/list", &[("shared", "/components/shared/shared")])
        .entry("components/shared/shared", &[]);

    let graph = project.built();

    assert_eq!(packages_of(&graph, "components/shared/shared.js"), vec!["pkgA"]);
    assert_eq!(
        output_of(&graph, "components/shared/shared.js", "pkgA"),
        PathBuf::from("pkgA/_reference/components/shared/shared.js")
    );
    // Companions travel with their entry
    assert_eq!(
        output_of(&graph, "components/shared/shared.wxml", "pkgA"),
        PathBuf::from("pkgA/_reference/components/shared/shared.wxml")
    );
    // Files already inside the package stay put
    assert_eq!(
        output_of(&graph, "pkgA/list.js", "pkgA"),
        PathBuf::from("pkgA/list.js")
    );

    let chunk = &graph.chunks()["pkgA/_reference/components/shared/shared"];
    assert_eq!(chunk.group, "pkgA");
    assert_eq!(chunk.package_name, "pkgA");
    assert!(!graph.chunks().contains_key("components/shared/shared"));
}

#[test]
fn independent_sub_package_gets_a_copy() {
    let project = Project::new();
    project
        .app(json!({
            "pages": [],
            "subPackages": [{ "root": "pkgA", "pages": ["list"], "independent": true }]
        }))
        .entry("pkgA/list", &[("shared", "/components/shared/shared")])
        .entry("components/shared/shared", &[]);

    let graph = project.built();

    assert_eq!(
        output_of(&graph, "components/shared/shared.js", "pkgA"),
        PathBuf::from("pkgA/_reference/components/shared/shared.js")
    );
    let chunk = &graph.chunks()["pkgA/_reference/components/shared/shared"];
    assert_eq!(chunk.group, "pkgA");
    assert!(chunk.independent);
    assert!(graph.registry().is_independent("pkgA"));
}

#[test]
fn component_shared_by_two_sub_packages_stays_in_main_group() {
    let project = Project::new();
    project
        .app(json!({
            "pages": [],
            "subpackages": [
                { "root": "pkgA", "pages": ["list"] },
                { "root": "pkgB", "pages": ["detail"] }
            ]
        }))
        .entry("pkgA/list", &[("shared", "/components/shared/shared")])
        .entry("pkgB/detail", &[("shared", "../components/shared/shared")])
        .entry("components/shared/shared", &[]);

    let graph = project.built();

    assert_eq!(
        packages_of(&graph, "components/shared/shared.js"),
        vec!["pkgA", "pkgB"]
    );
    for package in ["pkgA", "pkgB"] {
        assert_eq!(
            output_of(&graph, "components/shared/shared.js", package),
            PathBuf::from("components/shared/shared.js")
        );
    }
    let shared = graph.node_by_relative_path("components/shared/shared.js").unwrap();
    assert!(shared.chunk_infos().iter().all(|chunk| chunk.group == "app"));
    assert_eq!(graph.chunks()["components/shared/shared"].group, "app");
}

#[test]
fn component_used_by_main_and_independent_package() {
    let project = Project::new();
    project
        .app(json!({
            "pages": ["pages/index/index"],
            "subpackages": [{ "root": "indie", "pages": ["home"], "independent": true }]
        }))
        .entry("pages/index/index", &[("shared", "/components/shared/shared")])
        .entry("indie/home", &[("shared", "/components/shared/shared")])
        .entry("components/shared/shared", &[]);

    let graph = project.built();

    assert_eq!(
        output_of(&graph, "components/shared/shared.js", "app"),
        PathBuf::from("components/shared/shared.js")
    );
    assert_eq!(
        output_of(&graph, "components/shared/shared.js", "indie"),
        PathBuf::from("indie/_reference/components/shared/shared.js")
    );
    let chunks = graph.chunks();
    assert_eq!(chunks["components/shared/shared"].group, "app");
    assert_eq!(chunks["indie/_reference/components/shared/shared"].group, "indie");
}

#[test]
fn second_consumer_turns_copy_into_shared_path() {
    let project = Project::new();
    project
        .app(json!({
            "pages": [],
            "subpackages": [{ "root": "pkgA", "pages": ["list"] }]
        }))
        .entry("pkgA/list", &[("shared", "/components/shared/shared")])
        .entry("pkgB/detail", &[("shared", "/components/shared/shared")])
        .entry("components/shared/shared", &[]);

    let mut graph = project.graph();
    graph.build().unwrap();
    assert_eq!(
        output_of(&graph, "components/shared/shared.js", "pkgA"),
        PathBuf::from("pkgA/_reference/components/shared/shared.js")
    );

    project.app(json!({
        "pages": [],
        "subpackages": [
            { "root": "pkgA", "pages": ["list"] },
            { "root": "pkgB", "pages": ["detail"] }
        ]
    }));
    graph.build().unwrap();

    for package in ["pkgA", "pkgB"] {
        assert_eq!(
            output_of(&graph, "components/shared/shared.js", package),
            PathBuf::from("components/shared/shared.js")
        );
    }
}

#[test]
fn custom_tab_bar_is_a_main_package_component() {
    let project = Project::new();
    project
        .app(json!({
            "pages": ["pages/index/index"],
            "tabBar": { "custom": true, "list": [{ "pagePath": "pages/index/index" }] }
        }))
        .entry("pages/index/index", &[])
        .entry("custom-tab-bar/index", &[]);

    let graph = project.built();

    let tab_bar = graph.node_by_relative_path("custom-tab-bar/index.js").unwrap();
    assert_eq!(tab_bar.kind(), NodeKind::Component);
    assert_eq!(packages_of(&graph, "custom-tab-bar/index.js"), vec!["app"]);
}

#[test]
fn missing_custom_tab_bar_folder_fails_the_build() {
    let project = Project::new();
    project.app(json!({ "pages": [], "tabBar": { "custom": true, "list": [] } }));

    let mut graph = project.graph();
    assert!(matches!(
        graph.build(),
        Err(minipack_graph::GraphError::DirectoryNotFound { .. })
    ));
}

#[test]
fn tab_bar_icons_are_normal_assets() {
    let project = Project::new();
    project
        .app(json!({
            "pages": ["pages/index/index"],
            "tabBar": {
                "list": [{
                    "pagePath": "pages/index/index",
                    "iconPath": "assets/home.png",
                    "selectedIconPath": "/assets/home-active.png"
                }]
            }
        }))
        .entry("pages/index/index", &[])
        .write("assets/home.png", "")
        .write("assets/home-active.png", "");

    let graph = project.built();

    for icon in ["assets/home.png", "assets/home-active.png"] {
        let node = graph.node_by_relative_path(icon).unwrap();
        assert_eq!(node.kind(), NodeKind::NormalAsset);
        assert_eq!(packages_of(&graph, icon), vec!["app"]);
    }
    assert!(graph.node_by_relative_path("custom-tab-bar/index.js").is_none());
}

#[test]
fn app_level_components_belong_to_main_package() {
    let project = Project::new();
    project
        .app(json!({
            "pages": [],
            "usingComponents": { "nav": "/components/nav/nav" }
        }))
        .entry("components/nav/nav", &[]);

    let graph = project.built();

    assert_eq!(graph.root().unwrap().kind(), NodeKind::App);
    assert_eq!(packages_of(&graph, "components/nav/nav.js"), vec!["app"]);
}

#[test]
fn named_sub_package_uses_its_name() {
    let project = Project::new();
    project
        .app(json!({
            "pages": [],
            "subpackages": [{ "root": "packages/shop", "name": "shop", "pages": ["cart/cart"] }]
        }))
        .entry("packages/shop/cart/cart", &[("price", "/components/price/price")])
        .entry("components/price/price", &[]);

    let graph = project.built();

    assert_eq!(packages_of(&graph, "packages/shop/cart/cart.js"), vec!["shop"]);
    assert_eq!(
        output_of(&graph, "components/price/price.js", "shop"),
        PathBuf::from("packages/shop/_reference/components/price/price.js")
    );
    assert_eq!(
        graph.chunks()["packages/shop/_reference/components/price/price"].group,
        "packages/shop"
    );
}

#[test]
fn ignored_references_are_skipped() {
    let project = Project::new();
    project
        .app(json!({ "pages": ["pages/index/index"] }))
        .entry("pages/index/index", &[("chart", "plugin://charts/line")]);

    let graph = project.built();

    let page = project.path("pages/index/index.js");
    assert!(
        graph
            .dependencies(&page)
            .iter()
            .all(|node| node.kind() == NodeKind::EntryAsset)
    );
}

#[test]
fn configured_reference_dir_is_used() {
    let project = Project::new();
    project
        .app(json!({
            "pages": [],
            "subpackages": [{ "root": "pkgA", "pages": ["list"] }]
        }))
        .entry("pkgA/list", &[("shared", "/components/shared/shared")])
        .entry("components/shared/shared", &[]);

    let config = minipack_graph::MinipackConfig {
        reference_dir: "_shared".to_string(),
        ..Default::default()
    };
    let mut graph = project.graph_with(config);
    graph.build().unwrap();

    assert_eq!(
        output_of(&graph, "components/shared/shared.js", "pkgA"),
        PathBuf::from("pkgA/_shared/components/shared/shared.js")
    );
}
