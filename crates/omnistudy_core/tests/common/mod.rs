use omnistudy_core::StudyPlan;
use serde_json::json;

/// Two-variant plan with `moderate` selected; day 3 holds task `t1`.
pub fn moderate_plan() -> StudyPlan {
    serde_json::from_value(json!({
        "title": "Linear Algebra Finals",
        "selectedIntensity": "moderate",
        "variants": {
            "light": {
                "schedule": [
                    { "day": 3, "tasks": [{ "id": "t1", "completed": false, "title": "Skim ch. 3" }] }
                ]
            },
            "moderate": {
                "schedule": [
                    { "day": 1, "tasks": [
                        { "id": "t1", "completed": true, "title": "Vectors" },
                        { "id": "t2", "completed": false, "title": "Matrices" }
                    ] },
                    { "day": 3, "tasks": [
                        { "id": "t1", "completed": false, "title": "Eigenvalues" },
                        { "id": "t2", "completed": false, "title": "Practice set" }
                    ] },
                    { "day": 2, "tasks": [] }
                ]
            }
        }
    }))
    .expect("fixture plan should deserialize")
}
