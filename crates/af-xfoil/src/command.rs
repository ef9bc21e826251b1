//! Typed XFOIL command script.
//!
//! XFOIL reads its menu commands one line at a time from standard input and
//! has no tolerance for reordering or missing confirmation lines. The script
//! is therefore only constructible in the one order XFOIL expects, and each
//! instruction knows how to render its own prompts and confirmations.

use std::fmt::{self, Write as _};

use af_core::Real;

use crate::settings::{AlphaSweep, AnalysisSettings};

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// `load` + geometry path, relative to the solver working directory.
    Load { path: String },
    /// `pane`: regenerate the panel distribution.
    Panel,
    /// `oper`: enter the operating-point menu.
    EnterOper,
    /// `iter` + boundary-layer iteration limit.
    SetIterations(u32),
    /// `visc` + Reynolds number: switch to viscous mode.
    SetReynolds(Real),
    /// `pacc` + polar path + blank line declining a dump file.
    OpenPolar { path: String },
    /// `aseq` + start/end/step.
    Sweep(AlphaSweep),
    /// Blank line: leave the current menu.
    ExitMenu,
    Quit,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Load { path } => write!(f, "load\n{path}\n"),
            Instruction::Panel => f.write_str("pane\n"),
            Instruction::EnterOper => f.write_str("oper\n"),
            Instruction::SetIterations(n) => write!(f, "iter\n{n}\n"),
            Instruction::SetReynolds(re) => write!(f, "visc\n{re}\n"),
            Instruction::OpenPolar { path } => write!(f, "pacc\n{path}\n\n"),
            Instruction::Sweep(s) => write!(f, "aseq\n{}\n{}\n{}\n", s.start, s.end, s.step),
            Instruction::ExitMenu => f.write_str("\n"),
            Instruction::Quit => f.write_str("quit\n"),
        }
    }
}

/// The fixed instruction sequence for one viscous polar sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandScript {
    instructions: Vec<Instruction>,
}

impl CommandScript {
    /// Build the script for `geometry_path` writing the polar to `polar_path`.
    ///
    /// Both paths are as seen from the solver's working directory.
    pub fn viscous_polar(
        geometry_path: impl Into<String>,
        polar_path: impl Into<String>,
        settings: &AnalysisSettings,
    ) -> Self {
        let instructions = vec![
            Instruction::Load {
                path: geometry_path.into(),
            },
            Instruction::Panel,
            Instruction::EnterOper,
            Instruction::SetIterations(settings.iterations),
            Instruction::SetReynolds(settings.reynolds),
            Instruction::OpenPolar {
                path: polar_path.into(),
            },
            Instruction::Sweep(settings.alpha),
            Instruction::ExitMenu,
            Instruction::Quit,
        ];
        Self { instructions }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn polar_path(&self) -> Option<&str> {
        self.instructions.iter().find_map(|i| match i {
            Instruction::OpenPolar { path } => Some(path.as_str()),
            _ => None,
        })
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for instruction in &self.instructions {
            let _ = write!(out, "{instruction}");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script() -> CommandScript {
        CommandScript::viscous_polar(
            "./RunTime_12345678/airfoil_input.dat",
            "./RunTime_12345678/polar_output.dat",
            &AnalysisSettings::default(),
        )
    }

    #[test]
    fn renders_exact_protocol_lines() {
        let text = script().render();
        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(
            lines,
            vec![
                "load",
                "./RunTime_12345678/airfoil_input.dat",
                "pane",
                "oper",
                "iter",
                "100",
                "visc",
                "3000000",
                "pacc",
                "./RunTime_12345678/polar_output.dat",
                "",
                "aseq",
                "-5",
                "15",
                "1",
                "",
                "quit",
                "",
            ]
        );
    }

    #[test]
    fn fractional_sweep_values_render_verbatim() {
        let settings = AnalysisSettings {
            reynolds: 5.0e5,
            iterations: 200,
            alpha: AlphaSweep {
                start: -2.5,
                end: 8.0,
                step: 0.25,
            },
        };
        let text = CommandScript::viscous_polar("a.dat", "p.dat", &settings).render();
        assert!(text.contains("iter\n200\n"));
        assert!(text.contains("visc\n500000\n"));
        assert!(text.contains("aseq\n-2.5\n8\n0.25\n"));
    }

    #[test]
    fn order_is_fixed() {
        let s = script();
        let i = s.instructions();
        assert!(matches!(i[0], Instruction::Load { .. }));
        assert!(matches!(i[5], Instruction::OpenPolar { .. }));
        assert!(matches!(i[6], Instruction::Sweep(_)));
        assert_eq!(i.last(), Some(&Instruction::Quit));
        assert_eq!(s.polar_path(), Some("./RunTime_12345678/polar_output.dat"));
    }
}
