use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::{Day, Gender, Id, Role};
use crate::auth;
use crate::storage::entity::{require_text, Entity};
use crate::storage::{MemStorage, MemTable, StorageError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub email: String,
    /// Argon2 PHC string, see `auth::hash_password`
    pub password: String,
    pub full_name: String,
    pub role: Role,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
    pub phone_number: Option<String>,
    /// Keep `password` verbatim when it is already an argon2 hash. Only
    /// fixture loading sets this; request bodies cannot.
    #[serde(skip)]
    pub trusted_hash: bool,
}

fn hash(plain: &str) -> Result<String, StorageError> {
    auth::hash_password(plain).map_err(|e| StorageError::Hashing(e.to_string()))
}

impl Entity for User {
    type New = NewUser;
    const COLLECTION: &'static str = "users";
    const READONLY_FIELDS: &'static [&'static str] = &["created_at"];

    fn build(id: Id, new: NewUser) -> Self {
        Self {
            id,
            email: new.email.trim().to_string(),
            password: new.password,
            full_name: new.full_name,
            role: new.role,
            phone_number: new.phone_number,
            created_at: Utc::now(),
        }
    }

    fn prepare_new(new: &mut NewUser) -> Result<(), StorageError> {
        if new.trusted_hash && auth::is_hashed(&new.password) {
            return Ok(());
        }
        new.password = hash(&new.password)?;
        Ok(())
    }

    fn table(storage: &MemStorage) -> &MemTable<Self> {
        &storage.users
    }

    fn validate(&self) -> Result<(), StorageError> {
        require_text(Self::COLLECTION, "full_name", &self.full_name)?;
        if !self.email.contains('@') {
            return Err(StorageError::Validation(format!("invalid email address '{}'", self.email)));
        }
        Ok(())
    }

    fn conflicts_with(&self, other: &Self) -> Option<String> {
        if self.email.eq_ignore_ascii_case(&other.email) {
            return Some(format!("email '{}' is already registered", self.email));
        }
        None
    }

    fn prepare_patch(patch: &mut Map<String, Value>) -> Result<(), StorageError> {
        if let Some(Value::String(plain)) = patch.get("password") {
            let hashed = hash(plain)?;
            patch.insert("password".to_string(), Value::String(hashed));
        }
        Ok(())
    }

    fn present(&self) -> Result<Value, StorageError> {
        let mut value = serde_json::to_value(self)?;
        if let Some(fields) = value.as_object_mut() {
            fields.remove("password");
        }
        Ok(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct School {
    pub id: Id,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub principal_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSchool {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub principal_name: Option<String>,
}

impl Entity for School {
    type New = NewSchool;
    const COLLECTION: &'static str = "schools";
    const READONLY_FIELDS: &'static [&'static str] = &["created_at"];

    fn build(id: Id, new: NewSchool) -> Self {
        Self {
            id,
            name: new.name,
            address: new.address,
            phone: new.phone,
            email: new.email,
            principal_name: new.principal_name,
            created_at: Utc::now(),
        }
    }

    fn table(storage: &MemStorage) -> &MemTable<Self> {
        &storage.schools
    }

    fn validate(&self) -> Result<(), StorageError> {
        require_text(Self::COLLECTION, "name", &self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolAdmin {
    pub id: Id,
    pub user_id: Id,
    pub school_id: Id,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSchoolAdmin {
    pub user_id: Id,
    pub school_id: Id,
}

impl Entity for SchoolAdmin {
    type New = NewSchoolAdmin;
    const COLLECTION: &'static str = "school_admins";

    fn build(id: Id, new: NewSchoolAdmin) -> Self {
        Self {
            id,
            user_id: new.user_id,
            school_id: new.school_id,
        }
    }

    fn table(storage: &MemStorage) -> &MemTable<Self> {
        &storage.school_admins
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    pub id: Id,
    pub user_id: Id,
    pub school_id: Id,
    pub phone_number: Option<String>,
    pub subject_specialization: Option<String>,
    pub qualification: Option<String>,
    pub joining_date: Option<Day>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTeacher {
    pub user_id: Id,
    pub school_id: Id,
    pub phone_number: Option<String>,
    pub subject_specialization: Option<String>,
    pub qualification: Option<String>,
    pub joining_date: Option<Day>,
}

impl Entity for Teacher {
    type New = NewTeacher;
    const COLLECTION: &'static str = "teachers";

    fn build(id: Id, new: NewTeacher) -> Self {
        Self {
            id,
            user_id: new.user_id,
            school_id: new.school_id,
            phone_number: new.phone_number,
            subject_specialization: new.subject_specialization,
            qualification: new.qualification,
            joining_date: new.joining_date,
        }
    }

    fn table(storage: &MemStorage) -> &MemTable<Self> {
        &storage.teachers
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parent {
    pub id: Id,
    pub user_id: Id,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub occupation: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewParent {
    pub user_id: Id,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub occupation: Option<String>,
}

impl Entity for Parent {
    type New = NewParent;
    const COLLECTION: &'static str = "parents";

    fn build(id: Id, new: NewParent) -> Self {
        Self {
            id,
            user_id: new.user_id,
            phone_number: new.phone_number,
            address: new.address,
            occupation: new.occupation,
        }
    }

    fn table(storage: &MemStorage) -> &MemTable<Self> {
        &storage.parents
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: Id,
    pub user_id: Id,
    pub school_id: Id,
    pub class_id: Option<Id>,
    pub parent_id: Option<Id>,
    pub full_name: String,
    pub gender: Gender,
    pub dob: Option<Day>,
    pub admission_date: Option<Day>,
    pub parent_name: Option<String>,
    pub parent_contact: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStudent {
    pub user_id: Id,
    pub school_id: Id,
    pub class_id: Option<Id>,
    pub parent_id: Option<Id>,
    pub full_name: String,
    pub gender: Gender,
    pub dob: Option<Day>,
    pub admission_date: Option<Day>,
    pub parent_name: Option<String>,
    pub parent_contact: Option<String>,
    pub address: Option<String>,
}

impl Entity for Student {
    type New = NewStudent;
    const COLLECTION: &'static str = "students";

    fn build(id: Id, new: NewStudent) -> Self {
        Self {
            id,
            user_id: new.user_id,
            school_id: new.school_id,
            class_id: new.class_id,
            parent_id: new.parent_id,
            full_name: new.full_name,
            gender: new.gender,
            dob: new.dob,
            admission_date: new.admission_date,
            parent_name: new.parent_name,
            parent_contact: new.parent_contact,
            address: new.address,
        }
    }

    fn table(storage: &MemStorage) -> &MemTable<Self> {
        &storage.students
    }

    fn validate(&self) -> Result<(), StorageError> {
        require_text(Self::COLLECTION, "full_name", &self.full_name)
    }
}
