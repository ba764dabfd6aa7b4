// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Flat, fixed-size memory for the Intcode machine.

use std::error::Error;
use std::fmt::{self, Display};
use std::ops::Index;

/// An access outside of the bounds of [Memory]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct AddressFault {
    /// The address that was accessed
    pub address: i64,
    /// The size of the memory at the time of the access
    pub len: usize,
}

impl Display for AddressFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.address < 0 {
            write!(f, "attempted to access negative address {}", self.address)
        } else {
            write!(
                f,
                "attempted to access address {} in memory of size {}",
                self.address, self.len
            )
        }
    }
}

impl Error for AddressFault {}

/// The memory of an Intcode machine, which holds both its code and its data.
///
/// Memory is sized once, when it's built, and never grows. Programs that need scratch space past
/// the end of their code must be padded with zeroes before they're loaded:
///
/// ```
/// use intcode::Memory;
/// let mem = Memory::padded([1101, 1, 1, 6, 99], 8);
/// assert_eq!(mem.as_slice(), &[1101, 1, 1, 6, 99, 0, 0, 0]);
/// assert!(mem.read(8).is_err());
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Memory(Box<[i64]>);

impl Memory {
    /// Build memory from `code`, extended with zeroes up to `len` entries if it's shorter.
    pub fn padded(code: impl IntoIterator<Item = i64>, len: usize) -> Self {
        let mut v: Vec<i64> = code.into_iter().collect();
        if v.len() < len {
            v.resize(len, 0);
        }
        Self(v.into_boxed_slice())
    }

    fn checked_index(&self, address: i64) -> Result<usize, AddressFault> {
        usize::try_from(address)
            .ok()
            .filter(|&i| i < self.0.len())
            .ok_or(AddressFault {
                address,
                len: self.0.len(),
            })
    }

    /// Get the value at `address`
    #[doc(alias = "peek")]
    pub fn read(&self, address: i64) -> Result<i64, AddressFault> {
        self.checked_index(address).map(|i| self.0[i])
    }

    /// Set the value at `address`
    #[doc(alias = "poke")]
    pub fn write(&mut self, address: i64, value: i64) -> Result<(), AddressFault> {
        let i = self.checked_index(address)?;
        self.0[i] = value;
        Ok(())
    }

    /// The number of ints in memory
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the memory is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// View the whole memory as a slice
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }
}

impl FromIterator<i64> for Memory {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<i64>> for Memory {
    fn from(v: Vec<i64>) -> Self {
        Self(v.into_boxed_slice())
    }
}

impl From<Memory> for Vec<i64> {
    fn from(mem: Memory) -> Self {
        mem.0.into_vec()
    }
}

impl IntoIterator for Memory {
    type Item = i64;
    type IntoIter = std::vec::IntoIter<i64>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl Index<usize> for Memory {
    type Output = i64;
    fn index(&self, i: usize) -> &i64 {
        &self.0[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_enforced() {
        let mut mem: Memory = [1, 2, 3].into_iter().collect();
        assert_eq!(mem.read(2), Ok(3));
        assert_eq!(mem.read(3), Err(AddressFault { address: 3, len: 3 }));
        assert_eq!(mem.read(-1), Err(AddressFault { address: -1, len: 3 }));
        assert_eq!(mem.write(3, 0), Err(AddressFault { address: 3, len: 3 }));
        // failed writes don't grow or change memory
        assert_eq!(mem.as_slice(), &[1, 2, 3]);
        mem.write(0, 10).unwrap();
        assert_eq!(mem[0], 10);
    }

    #[test]
    fn padding_never_truncates() {
        assert_eq!(Memory::padded([1, 2, 3], 1).len(), 3);
        assert_eq!(Memory::padded([], 2).as_slice(), &[0, 0]);
    }

    #[test]
    fn fault_messages() {
        let neg = AddressFault { address: -5, len: 2 };
        assert_eq!(neg.to_string(), "attempted to access negative address -5");
        let past = AddressFault { address: 7, len: 2 };
        assert_eq!(
            past.to_string(),
            "attempted to access address 7 in memory of size 2"
        );
    }
}
