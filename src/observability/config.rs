use std::env;

#[derive(Clone)]
pub(crate) struct ServiceContext {
    pub(crate) service_name: String,
    pub(crate) environment: String,
    pub(crate) component: String,
}

#[derive(Clone)]
pub(crate) struct ObservabilityConfig {
    pub(crate) service_context: ServiceContext,
}

impl ObservabilityConfig {
    pub(crate) fn from_env(component: &str) -> Self {
        Self::from_values(component, env_string("SERVICE_NAME"), env_string("STAGE"))
    }

    fn from_values(
        component: &str,
        service_name: Option<String>,
        environment: Option<String>,
    ) -> Self {
        let component = component.trim().to_string();

        let service_name = service_name
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| component.clone());

        let environment = environment
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        Self {
            service_context: ServiceContext {
                service_name,
                environment,
                component,
            },
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_component_and_unknown_stage() {
        let config = ObservabilityConfig::from_values(" api ", None, Some("  ".to_string()));
        assert_eq!(config.service_context.service_name, "api");
        assert_eq!(config.service_context.environment, "unknown");
        assert_eq!(config.service_context.component, "api");
    }

    #[test]
    fn uses_explicit_service_name_and_stage() {
        let config = ObservabilityConfig::from_values(
            "api",
            Some("rtlo-compass".to_string()),
            Some("production".to_string()),
        );
        assert_eq!(config.service_context.service_name, "rtlo-compass");
        assert_eq!(config.service_context.environment, "production");
    }
}
