use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{BillStatus, Day, FeeFrequency, Id, PaymentStatus};
use crate::storage::entity::{require_non_negative, require_text, Entity};
use crate::storage::{MemStorage, MemTable, StorageError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeStructure {
    pub id: Id,
    pub school_id: Id,
    pub class_id: Id,
    pub name: String,
    pub amount: Decimal,
    pub frequency: FeeFrequency,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewFeeStructure {
    pub school_id: Id,
    pub class_id: Id,
    pub name: String,
    pub amount: Decimal,
    pub frequency: FeeFrequency,
    pub description: Option<String>,
}

impl Entity for FeeStructure {
    type New = NewFeeStructure;
    const COLLECTION: &'static str = "fee_structures";

    fn build(id: Id, new: NewFeeStructure) -> Self {
        Self {
            id,
            school_id: new.school_id,
            class_id: new.class_id,
            name: new.name,
            amount: new.amount,
            frequency: new.frequency,
            description: new.description,
        }
    }

    fn table(storage: &MemStorage) -> &MemTable<Self> {
        &storage.fee_structures
    }

    fn validate(&self) -> Result<(), StorageError> {
        require_text(Self::COLLECTION, "name", &self.name)?;
        require_non_negative(Self::COLLECTION, "amount", &self.amount)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeePayment {
    pub id: Id,
    pub student_id: Id,
    pub fee_structure_id: Id,
    pub amount: Decimal,
    pub payment_date: Day,
    pub payment_method: String,
    pub status: PaymentStatus,
    pub receipt_number: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewFeePayment {
    pub student_id: Id,
    pub fee_structure_id: Id,
    pub amount: Decimal,
    /// Defaults to today
    pub payment_date: Option<Day>,
    pub payment_method: String,
    #[serde(default = "default_payment_status")]
    pub status: PaymentStatus,
    /// Generated when omitted
    pub receipt_number: Option<String>,
}

fn default_payment_status() -> PaymentStatus {
    PaymentStatus::Paid
}

fn generate_receipt_number() -> String {
    let token = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("RCPT-{}", &token[..12])
}

impl Entity for FeePayment {
    type New = NewFeePayment;
    const COLLECTION: &'static str = "fee_payments";
    const READONLY_FIELDS: &'static [&'static str] = &["receipt_number"];

    fn build(id: Id, new: NewFeePayment) -> Self {
        Self {
            id,
            student_id: new.student_id,
            fee_structure_id: new.fee_structure_id,
            amount: new.amount,
            payment_date: new.payment_date.unwrap_or_else(Day::today),
            payment_method: new.payment_method,
            status: new.status,
            receipt_number: new
                .receipt_number
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(generate_receipt_number),
        }
    }

    fn table(storage: &MemStorage) -> &MemTable<Self> {
        &storage.fee_payments
    }

    fn validate(&self) -> Result<(), StorageError> {
        require_text(Self::COLLECTION, "payment_method", &self.payment_method)?;
        require_non_negative(Self::COLLECTION, "amount", &self.amount)
    }

    fn conflicts_with(&self, other: &Self) -> Option<String> {
        if self.receipt_number == other.receipt_number {
            return Some(format!("receipt number '{}' already used", self.receipt_number));
        }
        None
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub id: Id,
    pub school_id: Id,
    pub title: String,
    pub category: Option<String>,
    pub amount: Decimal,
    pub bill_date: Day,
    pub due_date: Option<Day>,
    pub status: BillStatus,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBill {
    pub school_id: Id,
    pub title: String,
    pub category: Option<String>,
    pub amount: Decimal,
    pub bill_date: Day,
    pub due_date: Option<Day>,
    #[serde(default = "default_bill_status")]
    pub status: BillStatus,
    pub description: Option<String>,
}

fn default_bill_status() -> BillStatus {
    BillStatus::Unpaid
}

impl Entity for Bill {
    type New = NewBill;
    const COLLECTION: &'static str = "bills";

    fn build(id: Id, new: NewBill) -> Self {
        Self {
            id,
            school_id: new.school_id,
            title: new.title,
            category: new.category,
            amount: new.amount,
            bill_date: new.bill_date,
            due_date: new.due_date,
            status: new.status,
            description: new.description,
        }
    }

    fn table(storage: &MemStorage) -> &MemTable<Self> {
        &storage.bills
    }

    fn validate(&self) -> Result<(), StorageError> {
        require_text(Self::COLLECTION, "title", &self.title)?;
        require_non_negative(Self::COLLECTION, "amount", &self.amount)
    }
}
