use tkb_primitives::summary::Summary;

use super::{ProposeInput, ProposedEventPayload, ProveInput, ProvedEventPayload};

impl Summary for ProposedEventPayload {
    fn summary(&self) -> String {
        let derivation = &self.derivation;
        format!(
            "proposal id: {}, proposer: {}, origin block: {}, forced: {}, blobs: {}, next proposal id: {}, last finalized: {}",
            self.proposal.id,
            self.proposal.proposer,
            derivation.originBlockNumber,
            derivation.isForcedInclusion,
            derivation.blobSlice.blobHashes.len(),
            self.coreState.nextProposalId,
            self.coreState.lastFinalizedProposalId,
        )
    }
}

impl Summary for ProvedEventPayload {
    fn summary(&self) -> String {
        let record = &self.transitionRecord;
        format!(
            "proposal id: {}, span: {}, block: {} ({}), actual prover: {}, bond instructions: {}",
            self.proposalId,
            record.span,
            self.transition.checkpoint.blockNumber,
            self.transition.checkpoint.blockHash,
            self.metadata.actualProver,
            record.bondInstructions.len(),
        )
    }
}

impl Summary for ProposeInput {
    fn summary(&self) -> String {
        format!(
            "deadline: {}, parent proposals: {}, blobs: {}+{}, transition records: {}, forced inclusions: {}",
            self.deadline,
            self.parentProposals.len(),
            self.blobReference.blobStartIndex,
            self.blobReference.numBlobs,
            self.transitionRecords.len(),
            self.numForcedInclusions,
        )
    }
}

impl Summary for ProveInput {
    fn summary(&self) -> String {
        let ids = self.proposals.iter().map(|p| p.id.to_string()).collect::<Vec<_>>();
        format!("proposals: [{}]", ids.join(", "))
    }
}
