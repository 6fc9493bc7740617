use ort::execution_providers::ExecutionProviderDispatch;

/// Where ONNX Runtime runs the pose model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionTarget {
    /// The platform accelerator when there is one: CoreML on macOS,
    /// DirectML on Windows. ONNX Runtime drops back to CPU if it fails to load.
    #[default]
    Auto,
    Cpu,
}

impl ExecutionTarget {
    /// Execution providers to register, in priority order. Empty means CPU.
    pub fn providers(self) -> Vec<ExecutionProviderDispatch> {
        match self {
            ExecutionTarget::Cpu => Vec::new(),
            ExecutionTarget::Auto => platform_providers(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ExecutionTarget::Cpu => "CPU",
            ExecutionTarget::Auto if cfg!(target_os = "macos") => "CoreML",
            ExecutionTarget::Auto if cfg!(target_os = "windows") => "DirectML",
            ExecutionTarget::Auto => "CPU",
        }
    }
}

fn platform_providers() -> Vec<ExecutionProviderDispatch> {
    #[cfg(target_os = "macos")]
    {
        vec![ort::execution_providers::CoreMLExecutionProvider::default().build()]
    }
    #[cfg(target_os = "windows")]
    {
        vec![ort::execution_providers::DirectMLExecutionProvider::default().build()]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_target_registers_no_providers() {
        assert!(ExecutionTarget::Cpu.providers().is_empty());
        assert_eq!(ExecutionTarget::Cpu.name(), "CPU");
    }

    #[test]
    fn test_auto_is_default() {
        assert_eq!(ExecutionTarget::default(), ExecutionTarget::Auto);
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    #[test]
    fn test_auto_is_cpu_elsewhere() {
        assert!(ExecutionTarget::Auto.providers().is_empty());
        assert_eq!(ExecutionTarget::Auto.name(), "CPU");
    }

    #[cfg(any(target_os = "macos", target_os = "windows"))]
    #[test]
    fn test_auto_registers_one_accelerator() {
        assert_eq!(ExecutionTarget::Auto.providers().len(), 1);
    }
}
