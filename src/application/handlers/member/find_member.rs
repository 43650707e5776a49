//! Optional member lookups used by order and customer flows.
//!
//! Both return `None` instead of an error when nothing matches.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::listing::MemberEntry;
use crate::domain::membership::MembershipError;
use crate::ports::{EmailAndName, MemberReader};

/// Query for an active member by group email, names and birthday.
#[derive(Debug, Clone)]
pub struct FindMemberByEmailAndNameQuery {
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub birthday: NaiveDate,
}

/// Query for the active member linked to a shop customer.
#[derive(Debug, Clone, Copy)]
pub struct FindMemberByCustomerQuery {
    pub customer_id: i64,
}

pub type FindMemberResult = Option<MemberEntry>;

pub struct FindMemberHandler {
    reader: Arc<dyn MemberReader>,
}

impl FindMemberHandler {
    pub fn new(reader: Arc<dyn MemberReader>) -> Self {
        Self { reader }
    }

    pub async fn by_email_and_name(
        &self,
        query: FindMemberByEmailAndNameQuery,
    ) -> Result<FindMemberResult, MembershipError> {
        let criteria = EmailAndName {
            email: query.email,
            firstname: query.firstname,
            lastname: query.lastname,
            birthday: query.birthday,
        };
        Ok(self.reader.find_by_email_and_name(&criteria).await?)
    }

    pub async fn by_customer(
        &self,
        query: FindMemberByCustomerQuery,
    ) -> Result<FindMemberResult, MembershipError> {
        Ok(self
            .reader
            .find_active_by_customer_id(query.customer_id)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{family, MockMemberReader};
    use super::*;
    use crate::domain::foundation::Timestamp;

    fn by_email(email: &str) -> FindMemberByEmailAndNameQuery {
        FindMemberByEmailAndNameQuery {
            email: email.to_string(),
            firstname: "Jane".to_string(),
            lastname: "Smith".to_string(),
            birthday: NaiveDate::from_ymd_opt(1982, 8, 20).unwrap(),
        }
    }

    #[tokio::test]
    async fn email_and_name_match_uses_group_email() {
        let family = family();
        let handler = FindMemberHandler::new(Arc::new(MockMemberReader::with_graph(&family.graph)));

        let found = handler
            .by_email_and_name(by_email("family@example.com"))
            .await
            .unwrap();
        assert_eq!(found.map(|e| e.member.id()), Some(family.spouse));

        let missing = handler
            .by_email_and_name(by_email("jane@example.com"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn customer_lookup_finds_linked_member() {
        let mut family = family();
        family
            .graph
            .assign_customer_id(family.primary, 5001, &Timestamp::now())
            .unwrap();
        let handler = FindMemberHandler::new(Arc::new(MockMemberReader::with_graph(&family.graph)));

        let found = handler
            .by_customer(FindMemberByCustomerQuery { customer_id: 5001 })
            .await
            .unwrap();
        assert_eq!(found.map(|e| e.member.id()), Some(family.primary));

        let missing = handler
            .by_customer(FindMemberByCustomerQuery { customer_id: 5002 })
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn reader_failure_is_a_persistence_error() {
        let handler = FindMemberHandler::new(Arc::new(MockMemberReader::failing()));
        let result = handler
            .by_customer(FindMemberByCustomerQuery { customer_id: 1 })
            .await;
        assert!(matches!(result, Err(MembershipError::Persistence(_))));
    }
}
