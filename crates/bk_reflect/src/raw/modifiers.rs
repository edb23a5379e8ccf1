use bitflags::bitflags;

bitflags! {
    /// Modifiers and structural traits of a class or member.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u16 {
        const PUBLIC        = 1 << 0;
        const PROTECTED     = 1 << 1;
        const PRIVATE       = 1 << 2;
        const STATIC        = 1 << 3;
        const FINAL         = 1 << 4;
        const ABSTRACT      = 1 << 5;
        /// Field excluded from the serialized form of its owner.
        const TRANSIENT     = 1 << 6;
        const INTERFACE     = 1 << 7;
        const PRIMITIVE     = 1 << 8;
        const ARRAY         = 1 << 9;
        /// The class itself declares that its instances can be serialized.
        const SERIALIZABLE  = 1 << 10;
        /// The class is nested inside another class.
        const MEMBER        = 1 << 11;
        /// The "class" stands for an unresolved type variable.
        const TYPE_VARIABLE = 1 << 12;
    }
}

impl Modifiers {
    /// Returns `true` for a nested class that captures an outer instance.
    #[inline]
    pub const fn is_inner_instance(self) -> bool {
        self.contains(Self::MEMBER) && !self.contains(Self::STATIC)
    }
}
