use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, FromRow)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: String,
    pub manager_id: Option<u64>,
    pub vacation_balance: i32,
    pub department: String,
    pub active: bool,
}

/// Manager summary embedded in user-facing payloads.
#[derive(Debug, Serialize, ToSchema)]
pub struct ManagerSummary {
    #[schema(example = 2)]
    pub id: u64,
    #[schema(example = "Maria Silva")]
    pub name: String,
    #[schema(example = "maria.silva@empresa.com")]
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 3)]
    pub id: u64,
    #[schema(example = "joao.santos@empresa.com")]
    pub email: String,
    #[schema(example = "Joao Santos")]
    pub name: String,
    #[schema(example = "employee")]
    pub role: String,
    #[schema(example = 30)]
    pub vacation_balance: i32,
    #[schema(example = "Engenharia")]
    pub department: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<ManagerSummary>,
}

impl User {
    pub fn into_response(self, manager: Option<ManagerSummary>) -> UserResponse {
        UserResponse {
            id: self.id,
            email: self.email,
            name: self.name,
            role: self.role,
            vacation_balance: self.vacation_balance,
            department: self.department,
            manager,
        }
    }
}
