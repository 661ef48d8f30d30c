use crate::types::BlockId;

/// Classification predicates consulted by face culling.
///
/// Air (`0`) is never passed through these; callers test it first.
pub trait BlockClass {
    fn is_plant(&self, id: BlockId) -> bool;
    fn is_transparent(&self, id: BlockId) -> bool;
    fn is_liquid(&self, id: BlockId) -> bool;
}

impl<T: BlockClass + ?Sized> BlockClass for &T {
    #[inline]
    fn is_plant(&self, id: BlockId) -> bool {
        (**self).is_plant(id)
    }
    #[inline]
    fn is_transparent(&self, id: BlockId) -> bool {
        (**self).is_transparent(id)
    }
    #[inline]
    fn is_liquid(&self, id: BlockId) -> bool {
        (**self).is_liquid(id)
    }
}

impl<T: BlockClass + ?Sized> BlockClass for std::sync::Arc<T> {
    #[inline]
    fn is_plant(&self, id: BlockId) -> bool {
        (**self).is_plant(id)
    }
    #[inline]
    fn is_transparent(&self, id: BlockId) -> bool {
        (**self).is_transparent(id)
    }
    #[inline]
    fn is_liquid(&self, id: BlockId) -> bool {
        (**self).is_liquid(id)
    }
}
