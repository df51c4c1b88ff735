use grid::{AngularStep, GridResult};

const MIB: f64 = 1024.0 * 1024.0;

/// What the status bar shows after a regeneration.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GridReport {
    pub step: AngularStep,
    pub count: usize,
    pub skip: usize,
    pub byte_size: usize,
}

impl GridReport {
    pub fn from_grid(grid: &GridResult) -> Self {
        Self {
            step: grid.step,
            count: grid.count,
            skip: grid.skip,
            byte_size: grid.byte_size,
        }
    }

    pub fn points_label(&self) -> String {
        points_label(self.count)
    }

    pub fn memory_label(&self) -> String {
        memory_label(self.byte_size)
    }
}

/// `"Points: 1,234,567"`.
pub fn points_label(count: usize) -> String {
    format!("Points: {}", group_thousands(count))
}

/// `"Approx VRAM: 0.7 MB"`, in MiB with one decimal.
pub fn memory_label(bytes: usize) -> String {
    format!("Approx VRAM: {:.1} MB", bytes as f64 / MIB)
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
