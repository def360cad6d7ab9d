//! Scripted host objects for unit tests

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::host::{HostError, HostObject, HostValue};

/// Host hash computing a 4-byte XOR fold of everything it is fed
pub struct ScriptedHash {
    state: [u8; 4],
    position: usize,
    digest_size: HostValue,
    block_size: HostValue,
    removed: HashSet<&'static str>,
    failing_finalize: bool,
    short_digest: bool,
    restarts: Rc<Cell<usize>>,
}

impl ScriptedHash {
    pub fn new() -> Self {
        Self {
            state: [0; 4],
            position: 0,
            digest_size: HostValue::Int(4),
            block_size: HostValue::Int(8),
            removed: HashSet::new(),
            failing_finalize: false,
            short_digest: false,
            restarts: Rc::new(Cell::new(0)),
        }
    }

    pub fn with_digest_size(mut self, value: HostValue) -> Self {
        self.digest_size = value;
        self
    }

    pub fn with_block_size(mut self, value: HostValue) -> Self {
        self.block_size = value;
        self
    }

    pub fn without(mut self, method: &'static str) -> Self {
        self.removed.insert(method);
        self
    }

    pub fn failing_finalize(mut self) -> Self {
        self.failing_finalize = true;
        self
    }

    pub fn short_digest(mut self) -> Self {
        self.short_digest = true;
        self
    }

    pub fn restart_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.restarts)
    }

    fn reset(&mut self) {
        self.state = [0; 4];
        self.position = 0;
    }
}

impl HostObject for ScriptedHash {
    fn class_name(&self) -> &str {
        "ScriptedHash"
    }

    fn has_method(&self, method: &str) -> bool {
        [
            "getName",
            "getDigestSize",
            "getBlockSize",
            "update",
            "finalize",
            "restart",
        ]
        .contains(&method)
            && !self.removed.contains(method)
    }

    fn call(&mut self, method: &str, args: &[HostValue]) -> Result<HostValue, HostError> {
        match method {
            "getName" => Ok(HostValue::Bytes(b"xor32".to_vec())),
            "getDigestSize" => Ok(self.digest_size.clone()),
            "getBlockSize" => Ok(self.block_size.clone()),
            "update" => match args.first() {
                Some(HostValue::Bytes(data)) => {
                    for byte in data {
                        self.state[self.position % 4] ^= byte;
                        self.position += 1;
                    }
                    Ok(HostValue::Null)
                }
                _ => Err(HostError::new("update() expects a string")),
            },
            "finalize" => {
                if self.failing_finalize {
                    // fails once, leaving the fed state in place
                    self.failing_finalize = false;
                    return Ok(HostValue::Bool(false));
                }
                let mut digest = self.state.to_vec();
                if self.short_digest {
                    digest.truncate(3);
                }
                self.reset();
                Ok(HostValue::Bytes(digest))
            }
            "restart" => {
                self.restarts.set(self.restarts.get() + 1);
                self.reset();
                Ok(HostValue::Null)
            }
            _ => Err(HostError::new(format!("undefined method {method}()"))),
        }
    }
}

/// Host cipher adding (encrypt) or subtracting (decrypt) a running counter
pub struct ScriptedCipher {
    block_size: HostValue,
    counter: u8,
    restarts: Rc<Cell<usize>>,
}

impl ScriptedCipher {
    pub fn new() -> Self {
        Self {
            block_size: HostValue::Int(4),
            counter: 0,
            restarts: Rc::new(Cell::new(0)),
        }
    }

    pub fn with_block_size(mut self, value: HostValue) -> Self {
        self.block_size = value;
        self
    }

    pub fn restart_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.restarts)
    }

    fn transform(&mut self, args: &[HostValue], forward: bool) -> Result<HostValue, HostError> {
        let Some(HostValue::Bytes(data)) = args.first() else {
            return Err(HostError::new("expects a string"));
        };
        let output = data
            .iter()
            .map(|byte| {
                let offset = self.counter;
                self.counter = self.counter.wrapping_add(1);
                if forward {
                    byte.wrapping_add(offset)
                } else {
                    byte.wrapping_sub(offset)
                }
            })
            .collect();
        Ok(HostValue::Bytes(output))
    }
}

impl HostObject for ScriptedCipher {
    fn class_name(&self) -> &str {
        "ScriptedCipher"
    }

    fn has_method(&self, method: &str) -> bool {
        ["getName", "getBlockSize", "encrypt", "decrypt", "restart"].contains(&method)
    }

    fn call(&mut self, method: &str, args: &[HostValue]) -> Result<HostValue, HostError> {
        match method {
            "getName" => Ok(HostValue::Bytes(b"counter-add".to_vec())),
            "getBlockSize" => Ok(self.block_size.clone()),
            "encrypt" => self.transform(args, true),
            "decrypt" => self.transform(args, false),
            "restart" => {
                self.counter = 0;
                self.restarts.set(self.restarts.get() + 1);
                Ok(HostValue::Null)
            }
            _ => Err(HostError::new(format!("undefined method {method}()"))),
        }
    }
}
