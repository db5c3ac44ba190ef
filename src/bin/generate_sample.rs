use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result};

use expr_delta::data::synth::{generate_pair, write_matrix, SynthParams};

fn main() -> Result<()> {
    env_logger::init();

    let params = SynthParams::default();
    let (a, b) = generate_pair(&params, 42);

    for (matrix, output_path) in [(&a, "sample_expr_a.txt"), (&b, "sample_expr_b.txt")] {
        let file = File::create(output_path)
            .with_context(|| format!("creating {output_path}"))?;
        write_matrix(matrix, BufWriter::new(file))
            .with_context(|| format!("writing {output_path}"))?;
        log::info!("Wrote {output_path}");
    }

    println!(
        "Wrote {} probes x {} chips to sample_expr_a.txt and sample_expr_b.txt",
        params.probes, params.chips
    );
    println!("Try: expr-delta 0.1,0.5,1 sample_expr_a.txt sample_expr_b.txt");
    Ok(())
}
