//! Definitions of Solidity functions called during deployment

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IGovernanceToken {
        function delegate(address delegatee) external;
        function numCheckpoints(address account) external view returns (uint32);
    }
}

sol! {
    #[sol(rpc)]
    interface ITimeLock {
        function PROPOSER_ROLE() external view returns (bytes32);
        function EXECUTOR_ROLE() external view returns (bytes32);
        function TIMELOCK_ADMIN_ROLE() external view returns (bytes32);
        function grantRole(bytes32 role, address account) external;
        function hasRole(bytes32 role, address account) external view returns (bool);
    }
}

sol! {
    #[sol(rpc)]
    interface IGovernor {
        function token() external view returns (address);
        function timelock() external view returns (address);
        function quorumNumerator() external view returns (uint256);
        function votingPeriod() external view returns (uint256);
        function votingDelay() external view returns (uint256);
    }
}

sol! {
    #[sol(rpc)]
    interface IBox {
        function owner() external view returns (address);
        function transferOwnership(address newOwner) external;
    }
}
