//! Member entity.
//!
//! A member is a person (self, spouse or child) belonging to exactly one
//! member group. Identity data is fixed at construction; only the active
//! flag and the customer link change afterwards.
//!
//! # Eligibility
//!
//! All eligibility predicates are pure functions of relationship, birthday
//! and the instant they are evaluated at:
//!
//! - adult child: child aged 18 or older
//! - minor child: child younger than 18
//! - a child older than 25 can no longer be activated

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::constraints::require_text;
use super::Relationship;
use crate::domain::foundation::{MemberGroupId, MemberId, Timestamp, ValidationError};

/// Age from which a child may purchase on their own.
pub const MIN_CHILD_ALLOW_PURCHASE_AGE: u32 = 18;

/// Age after which a child can no longer be activated.
pub const MAX_CHILD_ALLOW_PURCHASE_AGE: u32 = 25;

/// Identity data required to enroll a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub relationship: Relationship,
    pub firstname: String,
    pub lastname: String,
    pub birthday: NaiveDate,
}

impl NewMember {
    pub fn new(
        relationship: Relationship,
        firstname: impl Into<String>,
        lastname: impl Into<String>,
        birthday: NaiveDate,
    ) -> Self {
        Self {
            relationship,
            firstname: firstname.into(),
            lastname: lastname.into(),
            birthday,
        }
    }

    /// Checks the name constraints.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("firstname", &self.firstname)?;
        require_text("lastname", &self.lastname)
    }
}

/// Member entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub(crate) id: MemberId,
    pub(crate) group_id: MemberGroupId,
    pub(crate) relationship: Relationship,
    pub(crate) firstname: String,
    pub(crate) lastname: String,
    pub(crate) birthday: NaiveDate,
    pub(crate) active: bool,
    pub(crate) customer_id: Option<i64>,
    pub(crate) created_at: Timestamp,
}

impl Member {
    /// Creates an inactive member of `group_id`.
    pub fn create(
        id: MemberId,
        group_id: MemberGroupId,
        data: NewMember,
        created_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        data.validate()?;
        Ok(Self {
            id,
            group_id,
            relationship: data.relationship,
            firstname: data.firstname,
            lastname: data.lastname,
            birthday: data.birthday,
            active: false,
            customer_id: None,
            created_at,
        })
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn group_id(&self) -> MemberGroupId {
        self.group_id
    }

    pub fn relationship(&self) -> Relationship {
        self.relationship
    }

    pub fn firstname(&self) -> &str {
        &self.firstname
    }

    pub fn lastname(&self) -> &str {
        &self.lastname
    }

    /// First and last name joined by a single space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }

    pub fn birthday(&self) -> NaiveDate {
        self.birthday
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn customer_id(&self) -> Option<i64> {
        self.customer_id
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Whole years of age at `now`.
    pub fn age_at(&self, now: &Timestamp) -> u32 {
        now.full_years_since(self.birthday)
    }

    pub fn is_primary(&self) -> bool {
        self.relationship == Relationship::Primary
    }

    pub fn is_spouse(&self) -> bool {
        self.relationship == Relationship::Spouse
    }

    pub fn is_adult_child(&self, now: &Timestamp) -> bool {
        self.relationship == Relationship::Child
            && self.age_at(now) >= MIN_CHILD_ALLOW_PURCHASE_AGE
    }

    pub fn is_minor_child(&self, now: &Timestamp) -> bool {
        self.relationship == Relationship::Child
            && self.age_at(now) < MIN_CHILD_ALLOW_PURCHASE_AGE
    }

    /// Everyone except a minor child may be linked to a shop customer.
    pub fn is_allowed_to_create_customer(&self, now: &Timestamp) -> bool {
        !self.is_minor_child(now)
    }

    pub fn can_be_activated(&self, now: &Timestamp) -> bool {
        self.relationship != Relationship::Child
            || self.age_at(now) <= MAX_CHILD_ALLOW_PURCHASE_AGE
    }

    /// Links this member to a shop customer account.
    pub fn assign_customer_id(
        &mut self,
        customer_id: i64,
        now: &Timestamp,
    ) -> Result<(), ValidationError> {
        if customer_id <= 0 {
            return Err(ValidationError::out_of_range(
                "customer_id",
                1,
                i64::MAX,
                customer_id,
            ));
        }
        if !self.is_allowed_to_create_customer(now) {
            return Err(ValidationError::invalid_format(
                "customer_id",
                "minor children cannot be linked to a customer",
            ));
        }
        self.customer_id = Some(customer_id);
        Ok(())
    }

    /// Turns the member on if still eligible. Returns the resulting flag.
    pub(crate) fn activate(&mut self, now: &Timestamp) -> bool {
        if self.can_be_activated(now) {
            self.active = true;
        }
        self.active
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn now() -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap())
    }

    fn born(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn member(relationship: Relationship, birthday: NaiveDate) -> Member {
        Member::create(
            MemberId::new(1),
            MemberGroupId::new(1),
            NewMember::new(relationship, "Jane", "Smith", birthday),
            now(),
        )
        .unwrap()
    }

    #[test]
    fn new_member_starts_inactive_without_customer() {
        let m = member(Relationship::Primary, born(1980, 1, 1));
        assert!(!m.is_active());
        assert!(m.customer_id().is_none());
    }

    #[test]
    fn create_rejects_blank_firstname() {
        let result = Member::create(
            MemberId::new(1),
            MemberGroupId::new(1),
            NewMember::new(Relationship::Spouse, " ", "Smith", born(1980, 1, 1)),
            now(),
        );
        assert_eq!(result, Err(ValidationError::empty_field("firstname")));
    }

    #[test]
    fn full_name_joins_with_single_space() {
        let m = member(Relationship::Primary, born(1980, 1, 1));
        assert_eq!(m.full_name(), "Jane Smith");
    }

    #[test]
    fn child_turning_eighteen_today_is_adult() {
        let m = member(Relationship::Child, born(2006, 6, 15));
        assert!(m.is_adult_child(&now()));
        assert!(!m.is_minor_child(&now()));
    }

    #[test]
    fn child_day_before_eighteenth_birthday_is_minor() {
        let m = member(Relationship::Child, born(2006, 6, 16));
        assert!(m.is_minor_child(&now()));
        assert!(!m.is_adult_child(&now()));
        assert!(!m.is_allowed_to_create_customer(&now()));
    }

    #[test]
    fn non_children_are_neither_adult_nor_minor_children() {
        for rel in [Relationship::Primary, Relationship::Spouse] {
            let m = member(rel, born(2015, 1, 1));
            assert!(!m.is_adult_child(&now()));
            assert!(!m.is_minor_child(&now()));
            assert!(m.is_allowed_to_create_customer(&now()));
            assert!(m.can_be_activated(&now()));
        }
    }

    #[test]
    fn child_aged_twenty_five_can_still_be_activated() {
        let m = member(Relationship::Child, born(1998, 12, 31));
        assert_eq!(m.age_at(&now()), 25);
        assert!(m.can_be_activated(&now()));
    }

    #[test]
    fn child_aged_twenty_six_cannot_be_activated() {
        let mut m = member(Relationship::Child, born(1998, 6, 15));
        assert_eq!(m.age_at(&now()), 26);
        assert!(!m.can_be_activated(&now()));
        assert!(!m.activate(&now()));
    }

    #[test]
    fn assign_customer_rejects_minor_child() {
        let mut m = member(Relationship::Child, born(2012, 1, 1));
        assert!(m.assign_customer_id(99, &now()).is_err());
        assert!(m.customer_id().is_none());
    }

    #[test]
    fn assign_customer_links_adult() {
        let mut m = member(Relationship::Spouse, born(1985, 1, 1));
        m.assign_customer_id(99, &now()).unwrap();
        assert_eq!(m.customer_id(), Some(99));
    }

    #[test]
    fn assign_customer_rejects_non_positive_id() {
        let mut m = member(Relationship::Spouse, born(1985, 1, 1));
        assert!(m.assign_customer_id(0, &now()).is_err());
    }
}
