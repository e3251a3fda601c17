use crate::wire::HealthRes;

/// Simple health service used by the REST API.
///
/// Reports liveness and whether an AI credential is configured.
#[derive(Clone)]
pub struct HealthService;

impl HealthService {
    /// # Returns
    /// A `HealthRes` indicating the service is healthy, and whether generation is available.
    pub fn check_health(generation_available: bool) -> HealthRes {
        HealthRes {
            ok: true,
            message: "Discovery service is alive".into(),
            generation_available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_health_reports_generation_availability() {
        let res = HealthService::check_health(false);
        assert!(res.ok);
        assert!(!res.generation_available);

        let json = serde_json::to_value(HealthService::check_health(true)).unwrap();
        assert_eq!(json["generationAvailable"], true);
    }
}
