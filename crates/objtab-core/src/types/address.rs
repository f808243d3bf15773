//! Memory address type.

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::ObjtabError;

/// Strongly typed memory address
///
/// This wrapper around `u64` keeps link-time addresses, runtime bases and
/// plain sizes from being mixed up. Arithmetic wraps, matching how the
/// section-relative encoding stores `raw - lma` and later adds a base back:
/// the round trip is exact even when the intermediate value underflows.
///
/// ## Example
///
/// ```rust
/// use objtab_core::types::Address;
///
/// let addr = Address::from(0x1000);
/// let next_addr = addr + 0x100; // Add offset
/// assert_eq!(next_addr.value(), 0x1100);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(u64);

impl Address
{
    /// The null address (0x0)
    ///
    /// Sections start with this runtime base until a relocation pass runs.
    pub const ZERO: Self = Address(0);

    /// Create a new address from a `u64` value
    ///
    /// ```rust
    /// use objtab_core::types::Address;
    ///
    /// const FLASH_BASE: Address = Address::new(0x0800_0000);
    /// ```
    pub const fn new(value: u64) -> Self
    {
        Address(value)
    }

    /// Get the raw `u64` value of this address
    pub const fn value(self) -> u64
    {
        self.0
    }

    /// Whether this is the null address.
    pub const fn is_zero(self) -> bool
    {
        self.0 == 0
    }

    /// Add an offset to this address, checking for overflow
    ///
    /// ```rust
    /// use objtab_core::types::Address;
    ///
    /// let addr = Address::from(0x1000);
    /// assert_eq!(addr.checked_add(0x100), Some(Address::from(0x1100)));
    /// assert_eq!(addr.checked_add(u64::MAX), None); // Overflow
    /// ```
    pub fn checked_add(self, offset: u64) -> Option<Self>
    {
        self.0.checked_add(offset).map(Address)
    }

    /// Add an offset to this address, saturating at the maximum value
    pub fn saturating_add(self, offset: u64) -> Self
    {
        Address(self.0.saturating_add(offset))
    }
}

impl From<u64> for Address
{
    fn from(value: u64) -> Self
    {
        Address(value)
    }
}

impl From<Address> for u64
{
    fn from(address: Address) -> Self
    {
        address.0
    }
}

impl fmt::Display for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.pad(&format!("0x{:08x}", self.0))
    }
}

impl fmt::LowerHex for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl Add<u64> for Address
{
    type Output = Address;

    fn add(self, rhs: u64) -> Self::Output
    {
        Address(self.0.wrapping_add(rhs))
    }
}

impl Add<Address> for Address
{
    type Output = Address;

    fn add(self, rhs: Address) -> Self::Output
    {
        Address(self.0.wrapping_add(rhs.0))
    }
}

impl Sub<u64> for Address
{
    type Output = Address;

    fn sub(self, rhs: u64) -> Self::Output
    {
        Address(self.0.wrapping_sub(rhs))
    }
}

impl Sub<Address> for Address
{
    type Output = Address;

    fn sub(self, rhs: Address) -> Self::Output
    {
        Address(self.0.wrapping_sub(rhs.0))
    }
}

/// Parses `0x`-prefixed hexadecimal or plain decimal.
///
/// ```rust
/// use objtab_core::types::Address;
///
/// assert_eq!("0x8000".parse::<Address>().unwrap(), Address::new(0x8000));
/// assert_eq!("4096".parse::<Address>().unwrap(), Address::new(4096));
/// ```
impl FromStr for Address
{
    type Err = ObjtabError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        let trimmed = s.trim();
        let parsed = if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
            u64::from_str_radix(hex, 16)
        } else {
            trimmed.parse::<u64>()
        };
        parsed
            .map(Address)
            .map_err(|err| ObjtabError::InvalidArgument(format!("invalid address '{s}': {err}")))
    }
}
