//! Access flags and their mapping to source modifiers.
//!
//! The same bit means different things per declaration kind (`0x0040` is
//! `volatile` on a field and `bridge` on a method), so every lookup is keyed
//! by [`DeclarationKind`].

use crate::ast::Modifier;

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;
pub const ACC_PROTECTED: u16 = 0x0004;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_FINAL: u16 = 0x0010;
pub const ACC_SUPER: u16 = 0x0020;
pub const ACC_SYNCHRONIZED: u16 = 0x0020;
pub const ACC_VOLATILE: u16 = 0x0040;
pub const ACC_BRIDGE: u16 = 0x0040;
pub const ACC_TRANSIENT: u16 = 0x0080;
pub const ACC_VARARGS: u16 = 0x0080;
pub const ACC_NATIVE: u16 = 0x0100;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_STRICT: u16 = 0x0800;
pub const ACC_SYNTHETIC: u16 = 0x1000;
pub const ACC_ANNOTATION: u16 = 0x2000;
pub const ACC_ENUM: u16 = 0x4000;
pub const ACC_MANDATED: u16 = 0x8000;
pub const ACC_MODULE: u16 = 0x8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Class,
    Field,
    Method,
    Parameter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Public,
    Private,
    Protected,
    Static,
    Final,
    Super,
    Synchronized,
    Volatile,
    Bridge,
    Transient,
    Varargs,
    Native,
    Interface,
    Abstract,
    Strict,
    Synthetic,
    Annotation,
    Enum,
    Mandated,
    Module,
}

impl Flag {
    pub fn modifier(self) -> Option<Modifier> {
        Some(match self {
            Flag::Public => Modifier::Public,
            Flag::Private => Modifier::Private,
            Flag::Protected => Modifier::Protected,
            Flag::Static => Modifier::Static,
            Flag::Final => Modifier::Final,
            Flag::Synchronized => Modifier::Synchronized,
            Flag::Volatile => Modifier::Volatile,
            Flag::Transient => Modifier::Transient,
            Flag::Native => Modifier::Native,
            Flag::Abstract => Modifier::Abstract,
            Flag::Strict => Modifier::Strictfp,
            Flag::Super
            | Flag::Bridge
            | Flag::Varargs
            | Flag::Interface
            | Flag::Synthetic
            | Flag::Annotation
            | Flag::Enum
            | Flag::Mandated
            | Flag::Module => return None,
        })
    }
}

fn table(kind: DeclarationKind) -> &'static [(u16, Flag)] {
    match kind {
        DeclarationKind::Class => &[
            (ACC_PUBLIC, Flag::Public),
            (ACC_FINAL, Flag::Final),
            (ACC_SUPER, Flag::Super),
            (ACC_INTERFACE, Flag::Interface),
            (ACC_ABSTRACT, Flag::Abstract),
            (ACC_SYNTHETIC, Flag::Synthetic),
            (ACC_ANNOTATION, Flag::Annotation),
            (ACC_ENUM, Flag::Enum),
            (ACC_MODULE, Flag::Module),
        ],
        DeclarationKind::Field => &[
            (ACC_PUBLIC, Flag::Public),
            (ACC_PRIVATE, Flag::Private),
            (ACC_PROTECTED, Flag::Protected),
            (ACC_STATIC, Flag::Static),
            (ACC_FINAL, Flag::Final),
            (ACC_VOLATILE, Flag::Volatile),
            (ACC_TRANSIENT, Flag::Transient),
            (ACC_SYNTHETIC, Flag::Synthetic),
            (ACC_ENUM, Flag::Enum),
        ],
        DeclarationKind::Method => &[
            (ACC_PUBLIC, Flag::Public),
            (ACC_PRIVATE, Flag::Private),
            (ACC_PROTECTED, Flag::Protected),
            (ACC_STATIC, Flag::Static),
            (ACC_FINAL, Flag::Final),
            (ACC_SYNCHRONIZED, Flag::Synchronized),
            (ACC_BRIDGE, Flag::Bridge),
            (ACC_VARARGS, Flag::Varargs),
            (ACC_NATIVE, Flag::Native),
            (ACC_ABSTRACT, Flag::Abstract),
            (ACC_STRICT, Flag::Strict),
            (ACC_SYNTHETIC, Flag::Synthetic),
        ],
        DeclarationKind::Parameter => &[
            (ACC_FINAL, Flag::Final),
            (ACC_SYNTHETIC, Flag::Synthetic),
            (ACC_MANDATED, Flag::Mandated),
        ],
    }
}

/// Flags set in `access` that are meaningful for `kind`, in table order.
pub fn flags(access: u16, kind: DeclarationKind) -> Vec<Flag> {
    table(kind)
        .iter()
        .filter(|(bit, _)| access & bit != 0)
        .map(|&(_, flag)| flag)
        .collect()
}

pub fn has(access: u16, kind: DeclarationKind, flag: Flag) -> bool {
    table(kind)
        .iter()
        .any(|&(bit, f)| f == flag && access & bit != 0)
}

/// Source modifiers in JLS order.
pub fn to_modifiers(flags: &[Flag]) -> Vec<Modifier> {
    let mut modifiers: Vec<Modifier> = flags.iter().filter_map(|f| f.modifier()).collect();
    modifiers.sort();
    modifiers.dedup();
    modifiers
}

pub fn modifiers(access: u16, kind: DeclarationKind) -> Vec<Modifier> {
    to_modifiers(&flags(access, kind))
}

/// Re-encodes modifiers into access bits. `default` has no bit.
pub fn modifier_bits(modifiers: &[Modifier], kind: DeclarationKind) -> u16 {
    table(kind)
        .iter()
        .filter(|(_, flag)| {
            flag.modifier()
                .is_some_and(|m| modifiers.contains(&m))
        })
        .fold(0, |acc, (bit, _)| acc | bit)
}

/// Bits of `kind` that correspond to a source keyword.
pub fn modifier_mask(kind: DeclarationKind) -> u16 {
    table(kind)
        .iter()
        .filter(|(_, flag)| flag.modifier().is_some())
        .fold(0, |acc, (bit, _)| acc | bit)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: [DeclarationKind; 4] = [
        DeclarationKind::Class,
        DeclarationKind::Field,
        DeclarationKind::Method,
        DeclarationKind::Parameter,
    ];

    #[test]
    fn modifiers_round_trip_for_every_kind() {
        for kind in KINDS {
            let mask = modifier_mask(kind);
            let bits: Vec<u16> = (0..16).map(|i| 1u16 << i).filter(|b| mask & b != 0).collect();
            for combo in 0u32..(1 << bits.len()) {
                let access = bits
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| combo & (1 << i) != 0)
                    .fold(0u16, |acc, (_, b)| acc | b);
                let mods = modifiers(access, kind);
                assert_eq!(modifier_bits(&mods, kind), access, "{kind:?} {access:#06x}");
            }
        }
    }

    #[test]
    fn shared_bits_depend_on_kind() {
        assert_eq!(modifiers(ACC_VOLATILE, DeclarationKind::Field), vec![Modifier::Volatile]);
        assert!(modifiers(ACC_BRIDGE, DeclarationKind::Method).is_empty());
        assert_eq!(
            modifiers(ACC_SYNCHRONIZED, DeclarationKind::Method),
            vec![Modifier::Synchronized]
        );
        assert!(modifiers(ACC_SUPER, DeclarationKind::Class).is_empty());
    }

    #[test]
    fn modifiers_follow_source_order() {
        let mods = modifiers(ACC_FINAL | ACC_STATIC | ACC_PUBLIC, DeclarationKind::Field);
        assert_eq!(mods, vec![Modifier::Public, Modifier::Static, Modifier::Final]);
    }

    #[test]
    fn parameter_markers() {
        assert!(has(ACC_MANDATED, DeclarationKind::Parameter, Flag::Mandated));
        assert!(has(ACC_SYNTHETIC | ACC_FINAL, DeclarationKind::Parameter, Flag::Synthetic));
        assert!(!has(ACC_FINAL, DeclarationKind::Parameter, Flag::Synthetic));
        assert_eq!(
            modifiers(ACC_SYNTHETIC | ACC_FINAL, DeclarationKind::Parameter),
            vec![Modifier::Final]
        );
    }
}
