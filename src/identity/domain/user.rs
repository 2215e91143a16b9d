//! User aggregate root and validated identity scalars.

use super::{IdentityDomainError, Role, SectorId, UserId, capitalized};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated, lower-cased login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Creates a validated username.
    ///
    /// The value is trimmed and lower-cased.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::EmptyUsername`] when the value is
    /// empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let normalized = value.into().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(IdentityDomainError::EmptyUsername);
        }
        Ok(Self(normalized))
    }

    /// Returns the username as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Uzbek mobile number in `+998XXXXXXXXX` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    const COUNTRY_PREFIX: &'static str = "+998";
    const LOCAL_DIGITS: usize = 9;

    /// Creates a validated phone number.
    ///
    /// Accepts either the nine local digits or the full number with the
    /// `+998` country prefix; the stored form always carries the prefix.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::InvalidPhoneNumber`] when the local
    /// part is not exactly nine ASCII digits.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        let local = trimmed
            .strip_prefix(Self::COUNTRY_PREFIX)
            .unwrap_or(trimmed);
        let is_valid = local.len() == Self::LOCAL_DIGITS
            && local.chars().all(|ch| ch.is_ascii_digit());
        if !is_valid {
            return Err(IdentityDomainError::InvalidPhoneNumber(raw));
        }
        Ok(Self(format!("{}{local}", Self::COUNTRY_PREFIX)))
    }

    /// Returns the phone number as `str`, including the country prefix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Descriptive profile fields attached to a user.
///
/// Name-like fields are capitalized when set, matching how profile edits
/// are normalized before storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone_number: Option<PhoneNumber>,
    birth_date: Option<NaiveDate>,
    motto: Option<String>,
    primary_duty: Option<String>,
}

impl UserProfile {
    /// Creates an empty profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the first name, capitalized.
    #[must_use]
    pub fn with_first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(capitalized(&value.into()));
        self
    }

    /// Sets the last name, capitalized.
    #[must_use]
    pub fn with_last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(capitalized(&value.into()));
        self
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    /// Sets the phone number.
    #[must_use]
    pub fn with_phone_number(mut self, value: PhoneNumber) -> Self {
        self.phone_number = Some(value);
        self
    }

    /// Sets the birth date.
    #[must_use]
    pub const fn with_birth_date(mut self, value: NaiveDate) -> Self {
        self.birth_date = Some(value);
        self
    }

    /// Sets the personal motto, capitalized.
    #[must_use]
    pub fn with_motto(mut self, value: impl Into<String>) -> Self {
        self.motto = Some(capitalized(&value.into()));
        self
    }

    /// Sets the primary duty description, capitalized.
    #[must_use]
    pub fn with_primary_duty(mut self, value: impl Into<String>) -> Self {
        self.primary_duty = Some(capitalized(&value.into()));
        self
    }

    /// Returns the first name, if set.
    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    /// Returns the last name, if set.
    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    /// Returns the email address, if set.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the phone number, if set.
    #[must_use]
    pub const fn phone_number(&self) -> Option<&PhoneNumber> {
        self.phone_number.as_ref()
    }

    /// Returns the birth date, if set.
    #[must_use]
    pub const fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    /// Returns the personal motto, if set.
    #[must_use]
    pub fn motto(&self) -> Option<&str> {
        self.motto.as_deref()
    }

    /// Returns the primary duty description, if set.
    #[must_use]
    pub fn primary_duty(&self) -> Option<&str> {
        self.primary_duty.as_deref()
    }

    fn apply(&mut self, changes: ProfileChanges) {
        if let Some(value) = changes.first_name {
            self.first_name = Some(capitalized(&value));
        }
        if let Some(value) = changes.last_name {
            self.last_name = Some(capitalized(&value));
        }
        if let Some(value) = changes.email {
            self.email = Some(value);
        }
        if let Some(value) = changes.phone_number {
            self.phone_number = Some(value);
        }
        if let Some(value) = changes.birth_date {
            self.birth_date = Some(value);
        }
        if let Some(value) = changes.motto {
            self.motto = Some(capitalized(&value));
        }
        if let Some(value) = changes.primary_duty {
            self.primary_duty = Some(capitalized(&value));
        }
    }
}

/// Partial profile edit; only set fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    /// Replacement first name.
    pub first_name: Option<String>,
    /// Replacement last name.
    pub last_name: Option<String>,
    /// Replacement email address.
    pub email: Option<String>,
    /// Replacement phone number, already validated.
    pub phone_number: Option<PhoneNumber>,
    /// Replacement birth date.
    pub birth_date: Option<NaiveDate>,
    /// Replacement personal motto.
    pub motto: Option<String>,
    /// Replacement primary duty description.
    pub primary_duty: Option<String>,
}

/// User aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: Username,
    role: Role,
    sector: Option<SectorId>,
    profile: UserProfile,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted login name.
    pub username: Username,
    /// Persisted role.
    pub role: Role,
    /// Persisted sector membership, if any.
    pub sector: Option<SectorId>,
    /// Persisted profile fields.
    pub profile: UserProfile,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user, enforcing the role/sector invariant.
    ///
    /// Managers and employees must belong to exactly one sector; admins and
    /// directors are sector-less.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::SectorRequired`] or
    /// [`IdentityDomainError::SectorNotPermitted`] when the sector argument
    /// contradicts the role.
    pub fn new(
        username: Username,
        role: Role,
        sector: Option<SectorId>,
        clock: &impl Clock,
    ) -> Result<Self, IdentityDomainError> {
        if role.requires_sector() && sector.is_none() {
            return Err(IdentityDomainError::SectorRequired { role });
        }
        if !role.requires_sector() && sector.is_some() {
            return Err(IdentityDomainError::SectorNotPermitted { role });
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: UserId::new(),
            username,
            role,
            sector,
            profile: UserProfile::new(),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            username: data.username,
            role: data.role,
            sector: data.sector,
            profile: data.profile,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the login name.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the organizational role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the sector membership, if any.
    #[must_use]
    pub const fn sector(&self) -> Option<SectorId> {
        self.sector
    }

    /// Returns the profile fields.
    #[must_use]
    pub const fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the initial profile during construction.
    #[must_use]
    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Applies a partial profile edit.
    pub fn apply_profile_changes(&mut self, changes: ProfileChanges, clock: &impl Clock) {
        self.profile.apply(changes);
        self.touch(clock);
    }

    /// Replaces the login name. Uniqueness is the repository's concern.
    pub fn set_username(&mut self, username: Username, clock: &impl Clock) {
        self.username = username;
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
