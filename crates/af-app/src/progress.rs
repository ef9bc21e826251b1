use std::fmt;

/// Steps of one evaluation, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvaluationStage {
    GeneratingGeometry,
    PreparingWorkspace,
    RunningSolver,
    ParsingResults,
    CleaningUp,
    Completed,
}

impl EvaluationStage {
    pub fn label(&self) -> &'static str {
        match self {
            EvaluationStage::GeneratingGeometry => "geometry",
            EvaluationStage::PreparingWorkspace => "workspace",
            EvaluationStage::RunningSolver => "solver",
            EvaluationStage::ParsingResults => "parse",
            EvaluationStage::CleaningUp => "cleanup",
            EvaluationStage::Completed => "completed",
        }
    }
}

impl fmt::Display for EvaluationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
pub struct EvaluationProgressEvent {
    pub stage: EvaluationStage,
    pub elapsed_wall_s: f64,
    pub workspace: Option<String>,
    pub message: Option<String>,
}
