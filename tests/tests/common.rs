use bitcoin::secp256k1::rand::{thread_rng, Rng};
use confidential_zkp::{Commitment, Context, FixedAssetTag, Generator};

/// A transaction output as seen by its owner: the opening of its asset
/// generator and of its amount commitment.
pub struct Output {
    pub asset: FixedAssetTag,
    pub asset_blind: [u8; 32],
    pub value: u64,
    pub value_blind: [u8; 32],
}

impl Output {
    pub fn new(asset: FixedAssetTag, value: u64) -> Self {
        Self {
            asset,
            asset_blind: random_scalar(),
            value,
            value_blind: random_scalar(),
        }
    }

    pub fn generator(&self, ctx: &Context) -> eyre::Result<Generator> {
        Ok(self.asset.blinded_generator(ctx, &self.asset_blind)?)
    }

    pub fn commitment(&self, ctx: &Context) -> eyre::Result<Commitment> {
        Ok(Commitment::new(
            ctx,
            &self.value_blind,
            self.value,
            &self.generator(ctx)?,
        )?)
    }
}

/// Random bytes below the group order, with overwhelming probability.
pub fn random_scalar() -> [u8; 32] {
    let mut bytes: [u8; 32] = thread_rng().gen();
    bytes[0] &= 0x7f;
    bytes
}
