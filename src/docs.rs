use crate::api::alert::{AlertFilter, AlertListResponse};
use crate::api::attendance::{
    BreakEndRequest, BreakStartRequest, CheckInRequest, CheckInResponse, CheckOutRequest,
    CheckOutResponse, StatusResponse,
};
use crate::api::employee::{CreateEmployee, EmployeeListResponse};
use crate::api::geofence::CreateGeoFence;
use crate::api::policy::CreatePolicy;
use crate::model::attendance_alert::AttendanceAlert;
use crate::model::attendance_day::AttendanceDay;
use crate::model::break_period::BreakPeriod;
use crate::model::employee::Employee;
use crate::model::geofence::GeoFence;
use crate::model::work_hours_policy::WorkHoursPolicy;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Engine API",
        version = "1.0.0",
        description = r#"
## Geofenced Attendance Service

This API records employee check-in/check-out events, verifies them against
configured work locations, and derives attendance figures.

### 🔹 Key Features
- **Attendance Events**
  - Geofence/WiFi-verified check-in and check-out
  - Break tracking with per-day limits
  - Lateness, early-departure, and overtime evaluation
- **Policy Management**
  - Department-scoped and global work-hours policies
- **Location Management**
  - Circular geofences per branch with optional network signatures
- **Alert Feed**
  - Policy-violation records for the external notification dispatcher

### 📦 Response Format
- JSON-based RESTful responses
- State-machine rejections carry a machine-readable `error` kind
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::break_start,
        crate::api::attendance::break_end,
        crate::api::attendance::current_status,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::policy::list_policies,
        crate::api::policy::create_policy,
        crate::api::policy::update_policy,

        crate::api::geofence::list_geofences,
        crate::api::geofence::create_geofence,
        crate::api::geofence::update_geofence,

        crate::api::alert::alert_list,
        crate::api::alert::resolve_alert
    ),
    components(
        schemas(
            CheckInRequest,
            CheckInResponse,
            CheckOutRequest,
            CheckOutResponse,
            BreakStartRequest,
            BreakEndRequest,
            StatusResponse,
            AttendanceDay,
            BreakPeriod,
            WorkHoursPolicy,
            GeoFence,
            AttendanceAlert,
            CreateEmployee,
            EmployeeListResponse,
            Employee,
            CreatePolicy,
            CreateGeoFence,
            AlertFilter,
            AlertListResponse
        )
    ),
    tags(
        (name = "Attendance", description = "Check-in/check-out and break tracking APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Policy", description = "Work-hours policy APIs"),
        (name = "GeoFence", description = "Work-location APIs"),
        (name = "Alert", description = "Attendance alert feed APIs"),
    )
)]
pub struct ApiDoc;
