/// Diagnostic tool to verify the tree → partition layout pipeline
use std::path::PathBuf;

use sunburst_rs::config::SunburstConfig;
use sunburst_rs::layout::compute_layout;
use sunburst_rs::tree;
use sunburst_rs::ui::percentage::format_percentage;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sunburst_rs=debug".parse()?),
        )
        .init();

    let path = std::env::args().nth(1).map(PathBuf::from);

    println!("=== DIAGNOSTIC: Tree → Layout Pipeline ===");
    let tree = match &path {
        Some(path) => {
            println!("Loading: {}", path.display());
            tree::load_tree(path)?
        }
        None => {
            println!("Loading bundled sample");
            tree::sample_tree()?
        }
    };
    println!("\n[1] Tree built: {} nodes", tree.len());

    let root_node = tree.get(tree.root);
    println!(
        "    Root: '{}' (value={}, height={})",
        root_node.name,
        root_node.value,
        tree.height(tree.root)
    );

    let config = SunburstConfig::default();

    // Show top 10 children of root by value
    println!("\n[2] Top 10 children of root:");
    let mut root_children: Vec<_> = tree.children(tree.root).collect();
    root_children.sort_by(|&a, &b| tree.get(b).value.total_cmp(&tree.get(a).value));
    for (i, child_id) in root_children.iter().take(10).enumerate() {
        let child = tree.get(*child_id);
        println!(
            "    [{}] '{}' - {} ({}, children={})",
            i,
            child.name,
            child.value,
            format_percentage(child.value, root_node.value, &config),
            tree.children(*child_id).count()
        );
    }

    let layout = compute_layout(&tree, tree.root, &config.layout_config());
    println!(
        "\n[3] Layout computed: {} arcs over {} rings ({} nodes below the {} rad threshold)",
        layout.arcs.len(),
        layout.levels,
        tree.len() - layout.arcs.len(),
        config.visibility_threshold_radians
    );

    println!("\n[4] Ring radii:");
    let mut seen_depth = None;
    for arc in &layout.arcs {
        if seen_depth.map_or(true, |d| arc.depth > d) {
            println!(
                "    depth {}: [{:.4}, {:.4})",
                arc.depth, arc.inner_radius, arc.outer_radius
            );
            seen_depth = Some(arc.depth);
        }
    }

    println!("\n[5] Top 10 widest non-root arcs:");
    let mut sorted: Vec<_> = layout.arcs.iter().filter(|a| a.depth > 0).collect();
    sorted.sort_by(|a, b| b.span.total_cmp(&a.span));
    for (i, arc) in sorted.iter().take(10).enumerate() {
        println!(
            "    [{}] '{}' depth={} start={:.1}° span={:.1}°",
            i,
            tree.get(arc.node).name,
            arc.depth,
            arc.start.to_degrees(),
            arc.span.to_degrees()
        );
    }

    // Sibling spans should tile their parent exactly
    println!("\n[6] Checking for anomalies:");
    let mut mismatches = 0usize;
    for arc in &layout.arcs {
        let kids: Vec<_> = tree.children(arc.node).collect();
        if kids.is_empty() {
            continue;
        }
        let sum: f64 = kids.iter().map(|&k| tree.get(k).value).sum::<f64>()
            / layout.total_value.max(f64::MIN_POSITIVE)
            * std::f64::consts::TAU;
        if (sum - arc.span).abs() > 1e-9 {
            mismatches += 1;
            println!(
                "    '{}' children span {:.6} rad, parent {:.6} rad",
                tree.get(arc.node).name,
                sum,
                arc.span
            );
        }
    }
    println!("    {} span mismatches", mismatches);

    Ok(())
}
