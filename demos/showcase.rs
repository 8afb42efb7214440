/// Showcase: building, evaluating, differentiating and rendering functions
///
/// Run with: RUST_LOG=trace cargo run --example showcase
use diffable_fn::{Diff, DiffError, Expr, add, compose, div, mul, sub};
use std::f64::consts::E;

fn main() -> Result<(), DiffError> {
    env_logger::init();

    println!("=== Composable Differentiable Functions ===\n");

    part1_elementary()?;
    part2_combinations()?;
    part3_composition()?;
    part4_errors();
    part5_builder()?;

    println!("\nDone.");
    Ok(())
}

fn show(label: &str, f: &Expr, at: f64) -> Result<(), DiffError> {
    let d = f.differentiate()?;
    println!("  {}", label);
    println!("      f(x)  = {}", f);
    println!("      f'(x) = {}", d);
    println!("      f({}) = {}, f'({}) = {}\n", at, f.evaluate(at)?, at, d.evaluate(at)?);
    Ok(())
}

// =============================================================================
// PART 1: ELEMENTARY FAMILIES
// =============================================================================
fn part1_elementary() -> Result<(), DiffError> {
    println!("--- Part 1: elementary families ---\n");
    show("polynomial", &Expr::polynomial([2.0, 0.0, 3.0, -1.0])?, 1.0)?;
    show("exponential", &Expr::exponential(3.0, 2.0)?, 0.0)?;
    show("trigonometric", &Expr::trigonometric(2.0, "cos")?, 0.5)?;
    show("real power", &Expr::real_power(4.0, 0.5)?, 4.0)?;
    show("logarithm", &Expr::logarithm(10.0)?, 100.0)?;
    Ok(())
}

// =============================================================================
// PART 2: ARITHMETIC COMBINATIONS
// =============================================================================
fn part2_combinations() -> Result<(), DiffError> {
    println!("--- Part 2: sum, difference, product, quotient ---\n");
    let x = Expr::polynomial([1.0, 0.0])?;
    let x2 = Expr::polynomial([1.0, 0.0, 0.0])?;
    let sin = Expr::sine(1.0)?;

    show("sum", &add(x2.clone(), sin.clone())?, 1.0)?;
    show("difference", &sub(x2.clone(), Expr::cosine(1.0)?)?, 1.0)?;
    show("product", &mul(x.clone(), x2.clone())?, 2.0)?;
    show("quotient", &div(sin, x)?, 1.0)?;
    Ok(())
}

// =============================================================================
// PART 3: COMPOSITION
// =============================================================================
fn part3_composition() -> Result<(), DiffError> {
    println!("--- Part 3: composition ---\n");
    let inner = Expr::polynomial([1.0, 0.0, 1.0])?;

    // leaf-level: the family is kept, the argument changes
    show("sin(x^2 + 1)", &Expr::sine(1.0)?.compose(&inner), 1.0)?;

    // composite-level
    let cube = compose(Expr::real_power(1.0, 3.0)?, inner.clone())?;
    show("(x^2 + 1)^3", &cube, 1.0)?;

    let nested = compose(Expr::exponential(1.0, E)?, compose(Expr::logarithm(E)?, inner)?)?;
    show("e^(ln(x^2 + 1))", &nested, 2.0)?;
    Ok(())
}

// =============================================================================
// PART 4: ERRORS
// =============================================================================
fn part4_errors() {
    println!("--- Part 4: errors ---\n");

    if let Err(e) = Expr::exponential(1.0, -2.0) {
        println!("  invalid base:        {}", e);
    }
    if let Err(e) = Expr::trigonometric(1.0, "tan") {
        println!("  invalid flavor:      {}", e);
    }

    let in_y = Expr::polynomial([1.0, 0.0]).and_then(|p| p.in_var("y"));
    let mismatch = Expr::sine(1.0).and_then(|s| in_y.and_then(|y| add(s, y)));
    if let Err(e) = mismatch {
        println!("  argument mismatch:   {}", e);
    }

    let pole = Expr::polynomial([1.0])
        .and_then(|one| Expr::polynomial([1.0, -1.0]).and_then(|d| div(one, d)))
        .and_then(|q| q.evaluate(1.0));
    if let Err(e) = pole {
        println!("  division by zero:    {}", e);
    }
    println!();
}

// =============================================================================
// PART 5: BUILDER CONFIGURATION
// =============================================================================
fn part5_builder() -> Result<(), DiffError> {
    println!("--- Part 5: Diff builder ---\n");
    let f = mul(Expr::sine(1.0)?, Expr::cosine(1.0)?)?;

    let second = Diff::new().order(2);
    println!("  d²/dx² sin(x)cos(x) at 0.3 = {}", second.derivative_at(&f, 0.3)?);

    let mut deep = Expr::polynomial([1.0, 0.0])?;
    for _ in 0..50 {
        deep = compose(Expr::cosine(1.0)?, deep)?;
    }
    match Diff::new().max_depth(16).differentiate(&deep) {
        Ok(_) => println!("  depth 50 accepted"),
        Err(e) => println!("  depth 50 rejected:  {}", e),
    }
    match Diff::new().max_nodes(10).render(&deep) {
        Ok(_) => println!("  101 nodes accepted"),
        Err(e) => println!("  101 nodes rejected: {}", e),
    }
    Ok(())
}
