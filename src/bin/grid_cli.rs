use surfgrid::grid::{
    BumpDiagnostics, BumpOptions, ExportDiagnostics, GenerateDiagnostics, Grid, Point3,
    WeightedGrid,
};

const USAGE: &str = r#"grid_cli (surfgrid)

USAGE:
  grid_cli generate [options]

OPTIONS:
  --dim <UxV>          Bounding frame extent (default 10x10)
  --size <UxV>         Subdivision counts (default 8x8)
  --weight <W>         Produce a weighted grid carrying weight W
  --bumps <N>          Place N non-overlapping random bumps
  --bump-height <H>    Elevation of each bump center (default 5)
  --base-extent <E>    Bump footprint half-width in grid indices (default 2)
  --base-adjust <A>    Extra clearance between bumps (default 0)
  --all-positive       Raise every bump instead of picking random signs
  --seed <S>           Seed the bump placement for reproducible grids
  --translate <X,Y,Z>  Move the lattice origin before saving
  --out <FILE>         Output file (default grid.txt)
  -h, --help           Show this help
"#;

fn main() {
    if let Err(err) = run() {
        eprintln!("grid_cli error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut args = Args::new(args);

    let Some(command) = args.next() else {
        print_usage();
        return Ok(());
    };

    match command.as_str() {
        "generate" => cmd_generate(&mut args),
        "-h" | "--help" | "help" => {
            print_usage();
            Ok(())
        }
        other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
    }
}

fn print_usage() {
    println!("{USAGE}");
}

fn cmd_generate(args: &mut Args) -> Result<(), String> {
    let mut dim = (10.0, 10.0);
    let mut size = (8.0, 8.0);
    let mut weight: Option<f64> = None;
    let mut bump_count: Option<f64> = None;
    let mut bump_options = BumpOptions::default();
    let mut translate: Option<Point3> = None;
    let mut out = "grid.txt".to_string();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--dim" => dim = parse_pair(&args.value("--dim")?)?,
            "--size" => size = parse_pair(&args.value("--size")?)?,
            "--weight" => weight = Some(parse_number(&args.value("--weight")?)?),
            "--bumps" => bump_count = Some(parse_number(&args.value("--bumps")?)?),
            "--bump-height" => {
                bump_options.bump_height = parse_number(&args.value("--bump-height")?)?;
            }
            "--base-extent" => {
                bump_options.base_extent = parse_integer(&args.value("--base-extent")?)?;
            }
            "--base-adjust" => {
                bump_options.base_adjust = parse_integer(&args.value("--base-adjust")?)?;
            }
            "--all-positive" => bump_options.all_positive = true,
            "--seed" => {
                bump_options.seed =
                    Some(args.value("--seed")?.parse::<u64>().map_err(|e| {
                        format!("could not parse seed: {e}")
                    })?);
            }
            "--translate" => translate = Some(parse_point(&args.value("--translate")?)?),
            "--out" => out = args.value("--out")?,
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
        }
    }

    let mut grid = build_grid(dim, weight)?;

    let diagnostics = grid.generate(size.0, size.1)?;
    report_generate(&diagnostics);

    if let Some(count) = bump_count {
        let diagnostics = grid.bumps(count, &bump_options)?;
        report_bumps(&diagnostics);
    }

    if let Some(position) = translate {
        grid.translate(position)?;
        println!(
            "moved lattice origin to ({}, {}, {})",
            position.x, position.y, position.z
        );
    }

    let diagnostics = grid.save_to(&out)?;
    report_save(&diagnostics);

    Ok(())
}

/// Either grid flavor behind one set of operations.
enum AnyGrid {
    Plain(Grid),
    Weighted(WeightedGrid),
}

fn build_grid(dim: (f64, f64), weight: Option<f64>) -> Result<AnyGrid, String> {
    match weight {
        None => Ok(AnyGrid::Plain(
            Grid::new(dim.0, dim.1).map_err(|e| e.to_string())?,
        )),
        Some(w) => {
            let mut grid = WeightedGrid::new(dim.0, dim.1).map_err(|e| e.to_string())?;
            grid.set_weight(w).map_err(|e| e.to_string())?;
            Ok(AnyGrid::Weighted(grid))
        }
    }
}

impl AnyGrid {
    fn generate(&mut self, u: f64, v: f64) -> Result<GenerateDiagnostics, String> {
        match self {
            Self::Plain(grid) => grid.generate(u, v).map_err(|e| e.to_string()),
            Self::Weighted(grid) => grid.generate(u, v).map_err(|e| e.to_string()),
        }
    }

    fn bumps(&mut self, count: f64, options: &BumpOptions) -> Result<BumpDiagnostics, String> {
        match self {
            Self::Plain(grid) => grid.bumps(count, options).map_err(|e| e.to_string()),
            Self::Weighted(grid) => grid.bumps(count, options).map_err(|e| e.to_string()),
        }
    }

    fn translate(&mut self, position: Point3) -> Result<(), String> {
        match self {
            Self::Plain(grid) => grid.translate(position).map_err(|e| e.to_string()),
            Self::Weighted(grid) => grid.translate(position).map_err(|e| e.to_string()),
        }
    }

    fn save_to(&self, file_name: &str) -> Result<ExportDiagnostics, String> {
        match self {
            Self::Plain(grid) => grid.save_to(file_name).map_err(|e| e.to_string()),
            Self::Weighted(grid) => grid.save_to(file_name).map_err(|e| e.to_string()),
        }
    }
}

fn report_generate(diagnostics: &GenerateDiagnostics) {
    report_warnings(&diagnostics.warnings);
    println!(
        "generated {}x{} control points ({} total)",
        diagnostics.size_u + 1,
        diagnostics.size_v + 1,
        diagnostics.point_count
    );
}

fn report_bumps(diagnostics: &BumpDiagnostics) {
    report_warnings(&diagnostics.warnings);
    println!(
        "placed {} bumps in {} attempts",
        diagnostics.placed, diagnostics.attempts
    );
}

fn report_save(diagnostics: &ExportDiagnostics) {
    report_warnings(&diagnostics.warnings);
    println!(
        "wrote {} ({} bytes)",
        diagnostics.path.display(),
        diagnostics.byte_count
    );
}

fn report_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("warning: {warning}");
    }
}

fn parse_pair(value: &str) -> Result<(f64, f64), String> {
    let lower = value.to_ascii_lowercase();
    let (u, v) = lower
        .split_once('x')
        .ok_or_else(|| format!("expected `UxV`, got `{value}`"))?;
    Ok((parse_number(u)?, parse_number(v)?))
}

fn parse_point(value: &str) -> Result<Point3, String> {
    let components: Vec<&str> = value.split(',').collect();
    if components.len() != 3 {
        return Err(format!("expected `X,Y,Z`, got `{value}`"));
    }
    Ok(Point3::new(
        parse_number(components[0])?,
        parse_number(components[1])?,
        parse_number(components[2])?,
    ))
}

fn parse_number(value: &str) -> Result<f64, String> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("could not parse `{value}` as a number: {e}"))
}

fn parse_integer(value: &str) -> Result<i64, String> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("could not parse `{value}` as an integer: {e}"))
}

struct Args {
    values: Vec<String>,
    index: usize,
}

impl Args {
    fn new(values: Vec<String>) -> Self {
        Self { values, index: 0 }
    }

    fn next(&mut self) -> Option<String> {
        let value = self.values.get(self.index).cloned();
        if value.is_some() {
            self.index += 1;
        }
        value
    }

    fn value(&mut self, flag: &str) -> Result<String, String> {
        self.next()
            .ok_or_else(|| format!("missing value for `{flag}`\n\n{USAGE}"))
    }
}
