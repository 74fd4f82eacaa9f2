//! Print the SVG for a tree in the textual notation.
//!
//! ```text
//! RUST_LOG=exprviz=debug cargo run --example render --features tracing -- tree.viz
//! ```

use miette::IntoDiagnostic;

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let (name, input) = match std::env::args().nth(1) {
        Some(path) => {
            let input = std::fs::read_to_string(&path).into_diagnostic()?;
            (path, input)
        }
        None => (
            "<builtin>".to_string(),
            r#"Visualization.HorizontalArray(
    Visualization.SetColor(
        Visualization.Key(Symbolic.Symbol[Name="Ctrl"]),
        Color.Color[Red="0.8", Green="0.1", Blue="0.1", Alpha="1"]
    ),
    Visualization.Metrics(Visualization.SetBold(Symbolic.Symbol[Name="x"]))
)"#
            .to_string(),
        ),
    };

    let mut root = exprviz::notation::parse_named(&name, &input)?;
    for error in exprviz::normalize(&mut root) {
        eprintln!("{:?}", miette::Report::new(error));
    }
    println!(
        "{}",
        exprviz::render::render_svg(&mut root, &exprviz::RenderOptions::default())?
    );
    Ok(())
}
