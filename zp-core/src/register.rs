//! The five named registers and the register set a program runs against.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::MAX_VALUE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegisterError {
    #[error("unknown register {0:?}")]
    Unknown(String),
    #[error("value {value} for register {register} is outside the range [0, 32767]")]
    OutOfRange { register: Register, value: u32 },
}

/// Register names, in their canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Register {
    Ammo,
    Gems,
    Health,
    Score,
    Torches,
}

pub const NUM_REGISTERS: usize = 5;

impl Register {
    pub const ALL: [Register; NUM_REGISTERS] = [
        Register::Ammo,
        Register::Gems,
        Register::Health,
        Register::Score,
        Register::Torches,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Register::Ammo => "ammo",
            Register::Gems => "gems",
            Register::Health => "health",
            Register::Score => "score",
            Register::Torches => "torches",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Register {
    type Err = RegisterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Register::ALL
            .into_iter()
            .find(|r| r.name() == s)
            .ok_or_else(|| RegisterError::Unknown(s.to_string()))
    }
}

/// A full assignment of values to all five registers.
///
/// Values are always within `0..=MAX_VALUE`; the only ways in are the checked
/// setters, so an execution can never observe an out-of-range register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Registers {
    values: [u16; NUM_REGISTERS],
}

impl Registers {
    /// All registers at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a partial assignment; registers not mentioned stay 0.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, RegisterError>
    where
        I: IntoIterator<Item = (Register, u32)>,
    {
        let mut regs = Self::new();
        for (register, value) in pairs {
            regs.set(register, value)?;
        }
        Ok(regs)
    }

    pub fn get(&self, register: Register) -> u16 {
        self.values[register.index()]
    }

    pub fn set(&mut self, register: Register, value: u32) -> Result<(), RegisterError> {
        if value > MAX_VALUE as u32 {
            return Err(RegisterError::OutOfRange { register, value });
        }
        self.values[register.index()] = value as u16;
        Ok(())
    }

    /// Builder-style `set`.
    pub fn with(mut self, register: Register, value: u32) -> Result<Self, RegisterError> {
        self.set(register, value)?;
        Ok(self)
    }

    /// Adds `amount` if the sum stays in range; returns whether it did.
    pub fn try_add(&mut self, register: Register, amount: u16) -> bool {
        let sum = self.get(register) as u32 + amount as u32;
        if sum > MAX_VALUE as u32 {
            return false;
        }
        self.values[register.index()] = sum as u16;
        true
    }

    /// Subtracts `amount` if the difference stays >= 0; returns whether it did.
    pub fn try_sub(&mut self, register: Register, amount: u16) -> bool {
        match self.get(register).checked_sub(amount) {
            Some(diff) => {
                self.values[register.index()] = diff;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Register, u16)> + '_ {
        Register::ALL.into_iter().map(move |r| (r, self.get(r)))
    }

    pub fn to_map(&self) -> BTreeMap<Register, u16> {
        self.iter().collect()
    }
}

impl Serialize for Registers {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (r, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", r, v)?;
        }
        Ok(())
    }
}
