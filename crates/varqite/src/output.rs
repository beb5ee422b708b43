use crate::integrator::Evolution;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// `step,time,energy,grad_norm`, one row per Euler update.
pub fn write_evolution_csv<P: AsRef<Path>>(path: P, evolution: &Evolution) -> io::Result<()> {
    let mut f = BufWriter::new(File::create(path)?);
    writeln!(f, "step,time,energy,grad_norm")?;
    for r in &evolution.steps {
        writeln!(f, "{},{},{},{}", r.step, r.time, r.energy, r.grad_norm)?;
    }
    f.flush()
}

/// `evaluation,loss`, in the order the optimizer asked for them.
pub fn write_loss_csv<P: AsRef<Path>>(path: P, losses: &[f64]) -> io::Result<()> {
    let mut f = BufWriter::new(File::create(path)?);
    writeln!(f, "evaluation,loss")?;
    for (i, loss) in losses.iter().enumerate() {
        writeln!(f, "{},{}", i, loss)?;
    }
    f.flush()
}
