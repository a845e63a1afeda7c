use std::rc::Rc;

use colored::Colorize;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use rstree::arena::ComponentArena;
use rstree::component::{ComponentRef, Composite, Leaf};
use rstree::tree_traits::TreeNodeConvert;
use rstree::TreeResult;

/// Works with any component through the uniform interface.
fn client_code(component: &ComponentRef) {
    println!("RESULT: {}", component.borrow().operation());
}

/// Manages two components without inspecting their concrete types: the
/// capability probe decides whether an attach is possible.
fn client_code_merge(target: &ComponentRef, addition: &ComponentRef) {
    if target.borrow().is_composite() {
        target.borrow_mut().add(Rc::clone(addition));
    }
    println!("RESULT: {}", target.borrow().operation());
}

fn main() {
    setup_logging();

    if let Err(e) = run() {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

fn run() -> TreeResult<()> {
    let simple = Leaf::new();
    println!("Client: I've got a simple component:");
    client_code(&simple);
    println!();

    let tree = Composite::new();
    let branch1 = Composite::new();
    branch1.borrow_mut().add(Leaf::new());
    branch1.borrow_mut().add(Leaf::new());
    let branch2 = Composite::new();
    branch2.borrow_mut().add(Leaf::new());
    tree.borrow_mut().add(branch1);
    tree.borrow_mut().add(branch2);
    println!("Client: Now I've got a composite tree:");
    client_code(&tree);
    println!();

    println!("Client: I don't need to check the component classes even when managing the tree:");
    client_code_merge(&tree, &simple);
    println!();

    println!("{}", "Component tree:".green());
    println!("{}", tree.to_tree_string());

    // The same sample tree in the arena representation.
    let mut arena = ComponentArena::new();
    let root = arena.insert_composite(None);
    let branch1 = arena.insert_composite(Some(root));
    arena.insert_leaf(Some(branch1));
    arena.insert_leaf(Some(branch1));
    let branch2 = arena.insert_composite(Some(root));
    arena.insert_leaf(Some(branch2));

    println!("{}", "Arena tree:".green());
    println!("RESULT: {}", arena.operation(root)?);
    println!("{}", arena.to_tree_string());

    Ok(())
}

fn setup_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::ENTER)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(env_filter))
        .init();
}
